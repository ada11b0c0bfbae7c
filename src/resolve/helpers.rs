//! Similarity scoring shared by the cascade stages.

use strsim::levenshtein;

use crate::resolve::MappingTable;

/// Levenshtein similarity as a percentage (0.0-100.0).
///
/// Plain ratio only; no token-sort or partial variants, so every stage of
/// the cascade ranks candidates the same way.
pub(crate) fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 100.0;
    }
    let dist = levenshtein(a, b);
    (1.0 - (dist as f64 / max_len as f64)) * 100.0
}

/// Best-scoring mapping entry for `query`, or `None` if nothing clears
/// `cutoff`. Keys are scanned in insertion order and only a strictly
/// greater score replaces the running best, so ties go to the
/// first-encountered key: deterministic given mapping order.
pub(crate) fn best_match<'a>(
    query: &str,
    mapping: &'a MappingTable,
    cutoff: f64,
) -> Option<(&'a str, f64)> {
    let mut best: Option<(&'a str, f64)> = None;
    for (key, code) in mapping.entries() {
        let score = levenshtein_ratio(query, key);
        match best {
            Some((_, s)) if score <= s => {}
            _ => best = Some((code, score)),
        }
    }
    best.filter(|&(_, s)| s >= cutoff)
}
