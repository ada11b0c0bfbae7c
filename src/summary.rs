//! Run summary reporting.
//!
//! One `RunSummary` per convert run; rendered to the console at the end
//! and into the XLSX summary sheet when that format is selected.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::metrics::memory_snapshot_mb;
use crate::models::{MatchStrategy, ResolutionResult};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tool: &'static str,
    pub input_path: String,
    pub reference_path: Option<String>,
    pub mapping_entries: usize,
    pub total_rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Rows whose output column holds the literal `unknown` sentinel.
    pub unknown_values: usize,
    pub dropped_rows: usize,
    pub strategy_counts: BTreeMap<&'static str, usize>,
    pub started_utc: DateTime<Utc>,
    pub ended_utc: DateTime<Utc>,
    pub mem_used_start_mb: u64,
    pub mem_used_end_mb: u64,
}

impl RunSummary {
    pub fn new(tool: &'static str, input_path: &str) -> Self {
        let now = Utc::now();
        Self {
            tool,
            input_path: input_path.to_string(),
            reference_path: None,
            mapping_entries: 0,
            total_rows: 0,
            matched: 0,
            unmatched: 0,
            unknown_values: 0,
            dropped_rows: 0,
            strategy_counts: BTreeMap::new(),
            started_utc: now,
            ended_utc: now,
            mem_used_start_mb: memory_snapshot_mb().used_mb,
            mem_used_end_mb: 0,
        }
    }

    /// Fold a batch of resolution results into the counters.
    pub fn record_results(&mut self, results: &[ResolutionResult]) {
        self.total_rows += results.len();
        for r in results {
            if r.matched {
                self.matched += 1;
            } else {
                self.unmatched += 1;
            }
            *self.strategy_counts.entry(r.strategy.as_str()).or_insert(0) += 1;
        }
    }

    /// Stamp the end of the run.
    pub fn finish(&mut self) {
        self.ended_utc = Utc::now();
        self.mem_used_end_mb = memory_snapshot_mb().used_mb;
    }

    pub fn duration_secs(&self) -> f64 {
        (self.ended_utc - self.started_utc).num_milliseconds() as f64 / 1000.0
    }

    /// Key/value lines shared by the console rendering and the XLSX
    /// summary sheet.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("Tool".to_string(), self.tool.to_string()),
            ("Data file".to_string(), self.input_path.clone()),
        ];
        if let Some(r) = &self.reference_path {
            out.push(("Reference file".to_string(), r.clone()));
            out.push((
                "Mapping entries".to_string(),
                self.mapping_entries.to_string(),
            ));
        }
        out.push(("Rows processed".to_string(), self.total_rows.to_string()));
        out.push(("Matched".to_string(), self.matched.to_string()));
        out.push(("Unmatched".to_string(), self.unmatched.to_string()));
        out.push((
            "Unknown values".to_string(),
            self.unknown_values.to_string(),
        ));
        out.push(("Rows dropped".to_string(), self.dropped_rows.to_string()));
        for strategy in MatchStrategy::ALL {
            if let Some(n) = self.strategy_counts.get(strategy.as_str()) {
                out.push((format!("Strategy {}", strategy.as_str()), n.to_string()));
            }
        }
        out.push((
            "Started (UTC)".to_string(),
            self.started_utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
        out.push((
            "Ended (UTC)".to_string(),
            self.ended_utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
        out.push((
            "Duration".to_string(),
            format!("{:.2}s", self.duration_secs()),
        ));
        out.push((
            "Memory used (MB)".to_string(),
            format!("{} -> {}", self.mem_used_start_mb, self.mem_used_end_mb),
        ));
        out
    }

    /// Plain-text rendering for the console.
    pub fn render_text(&self) -> String {
        let entries = self.entries();
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut out = String::from("Run Summary\n===========\n");
        for (k, v) in entries {
            out.push_str(&format!("{:<width$}  {}\n", k, v, width = width));
        }
        out
    }
}
