//! Geo-ID filtering: keep the rows of one table whose identifier appears
//! in another.

use std::collections::BTreeSet;

use crate::ingest::Table;

/// Outcome of a filter run, including the one-sided difference sets for
/// diagnostics. BTreeSets keep the reporting order deterministic.
#[derive(Debug, Clone)]
pub struct FilterReport {
    /// Rows of the data table whose id is shared, in original order.
    pub rows: Vec<Vec<String>>,
    pub matching_ids: BTreeSet<String>,
    /// Ids present in the data table but not the reference.
    pub only_in_data: BTreeSet<String>,
    /// Ids present in the reference but not the data table.
    pub only_in_reference: BTreeSet<String>,
    pub data_rows_total: usize,
    pub reference_ids_total: usize,
}

/// Intersect the trimmed identifier values of the two selected columns and
/// keep the data rows whose id is shared. An empty intersection is a normal
/// zero-match outcome, not an error.
pub fn filter_by_shared_ids(
    data: &Table,
    data_idx: usize,
    reference: &Table,
    ref_idx: usize,
) -> FilterReport {
    let data_ids: BTreeSet<String> = data
        .column_values(data_idx)
        .map(|v| v.trim().to_string())
        .collect();
    let reference_ids: BTreeSet<String> = reference
        .column_values(ref_idx)
        .map(|v| v.trim().to_string())
        .collect();

    let matching_ids: BTreeSet<String> = data_ids.intersection(&reference_ids).cloned().collect();

    let rows = data
        .rows
        .iter()
        .filter(|row| {
            let id = row.get(data_idx).map(String::as_str).unwrap_or("").trim();
            matching_ids.contains(id)
        })
        .cloned()
        .collect();

    FilterReport {
        rows,
        only_in_data: data_ids.difference(&reference_ids).cloned().collect(),
        only_in_reference: reference_ids.difference(&data_ids).cloned().collect(),
        matching_ids,
        data_rows_total: data.rows.len(),
        reference_ids_total: reference_ids.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_intersection_and_differences() {
        let data = table(&["id", "v"], &[&["1", "a"], &["2", "b"], &["3", "c"]]);
        let reference = table(&["geo"], &[&["2"], &["3"], &["4"]]);
        let report = filter_by_shared_ids(&data, 0, &reference, 0);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0][0], "2");
        assert_eq!(report.rows[1][0], "3");
        let matching: Vec<&str> = report.matching_ids.iter().map(String::as_str).collect();
        assert_eq!(matching, vec!["2", "3"]);
        let only1: Vec<&str> = report.only_in_data.iter().map(String::as_str).collect();
        assert_eq!(only1, vec!["1"]);
        let only2: Vec<&str> = report.only_in_reference.iter().map(String::as_str).collect();
        assert_eq!(only2, vec!["4"]);
    }

    #[test]
    fn test_ids_are_trimmed_before_comparison() {
        let data = table(&["id"], &[&[" 7 "]]);
        let reference = table(&["id"], &[&["7"]]);
        let report = filter_by_shared_ids(&data, 0, &reference, 0);
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_empty_intersection_is_not_an_error() {
        let data = table(&["id"], &[&["1"], &["2"]]);
        let reference = table(&["id"], &[&["9"]]);
        let report = filter_by_shared_ids(&data, 0, &reference, 0);
        assert!(report.rows.is_empty());
        assert!(report.matching_ids.is_empty());
        assert_eq!(report.only_in_data.len(), 2);
        assert_eq!(report.data_rows_total, 2);
    }
}
