//! Name-to-code resolution: mapping table, cascade, and batch driver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::metrics::memory_snapshot_mb;
use crate::models::{RawValue, ResolutionResult};
use crate::normalize::normalize;

pub mod cascade;
mod helpers;

pub use cascade::resolve;

/// Literal output value that marks a row as unresolvable reference data.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Read-only name-to-code mapping, built once per batch.
///
/// Keys are pre-normalized and kept in insertion order; a duplicate key
/// overwrites the earlier code but keeps its original position, so lookup
/// sees the last write while fuzzy scans stay deterministic. Duplicates are
/// not an error (callers own dedup of their reference data).
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    keys: Vec<String>,
    codes: Vec<String>,
    index: HashMap<String, usize>,
}

impl MappingTable {
    /// Build from (name, code) pairs in input order. Names are normalized
    /// into keys here; blank names produce an empty key, which is permitted
    /// but never usefully matches (filtering them is the caller's job).
    pub fn build<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut table = MappingTable::default();
        let mut overwritten = 0usize;
        for (name, code) in pairs {
            let key = normalize(name.as_ref());
            match table.index.get(&key) {
                Some(&i) => {
                    table.codes[i] = code.into();
                    overwritten += 1;
                }
                None => {
                    table.index.insert(key.clone(), table.keys.len());
                    table.keys.push(key);
                    table.codes.push(code.into());
                }
            }
        }
        if overwritten > 0 {
            log::warn!(
                "mapping table: {} duplicate name keys, keeping the last code for each",
                overwritten
            );
        }
        table
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.codes[i].as_str())
    }

    /// (key, code) pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.codes.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressConfig {
    /// Emit a progress update every this many resolved values.
    pub update_every: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { update_every: 1000 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub processed: usize,
    pub total: usize,
    pub percent: f32,
    pub elapsed_ms: u64,
    pub mem_used_mb: u64,
    pub mem_avail_mb: u64,
}

/// Resolve a batch of values against a shared read-only mapping.
///
/// Each value resolves independently, so the batch fans out across the
/// rayon pool; results come back in input order.
pub fn resolve_batch(values: &[RawValue], mapping: &MappingTable) -> Vec<ResolutionResult> {
    resolve_batch_with_progress(values, mapping, ProgressConfig::default(), |_| {})
}

/// As [`resolve_batch`], reporting progress every
/// [`ProgressConfig::update_every`] values (and on the final one).
pub fn resolve_batch_with_progress<F>(
    values: &[RawValue],
    mapping: &MappingTable,
    cfg: ProgressConfig,
    on_progress: F,
) -> Vec<ResolutionResult>
where
    F: Fn(ProgressUpdate) + Sync,
{
    let start = Instant::now();
    let total = values.len();
    let every = cfg.update_every.max(1);
    let done = AtomicUsize::new(0);

    values
        .par_iter()
        .map(|value| {
            let result = guarded_resolve(value, || cascade::resolve(value, mapping));
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if n % every == 0 || n == total {
                let mem = memory_snapshot_mb();
                on_progress(ProgressUpdate {
                    processed: n,
                    total,
                    percent: (n as f32 / total.max(1) as f32) * 100.0,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                    mem_used_mb: mem.used_mb,
                    mem_avail_mb: mem.avail_mb,
                });
            }
            result
        })
        .collect()
}

/// Run one resolution, isolating panics: a single bad value is logged and
/// passed through unresolved instead of taking the batch down.
fn guarded_resolve<F>(value: &RawValue, run: F) -> ResolutionResult
where
    F: FnOnce() -> ResolutionResult,
{
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(run)) {
        Ok(result) => result,
        Err(_) => {
            log::warn!(
                "resolution panicked on value {:?}; passing it through unresolved",
                value
            );
            ResolutionResult::passthrough(value.clone())
        }
    }
}

/// Caller-driven policy for rows that resolved to [`UNKNOWN_SENTINEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownPolicy {
    KeepAll,
    DropUnknown,
}

/// Whether a result renders as the literal `unknown` sentinel
/// (case-sensitive).
pub fn is_unknown(result: &ResolutionResult) -> bool {
    result.value.render() == UNKNOWN_SENTINEL
}

/// Batch post-filter: drop results rendering as `unknown` when the policy
/// asks for it. Never automatic; the caller decides.
pub fn filter_unknown(
    results: Vec<ResolutionResult>,
    policy: UnknownPolicy,
) -> Vec<ResolutionResult> {
    match policy {
        UnknownPolicy::KeepAll => results,
        UnknownPolicy::DropUnknown => results.into_iter().filter(|r| !is_unknown(r)).collect(),
    }
}
