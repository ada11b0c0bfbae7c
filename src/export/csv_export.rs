//! Processed-table CSV export.

use std::fs::File;
use std::io::BufWriter;

use csv::WriterBuilder;

use crate::error::ExportError;
use crate::ingest::Table;

/// Write a table as UTF-8 CSV (header row plus data rows, no index
/// column), same shape as the ingested input.
pub fn export_table_csv(table: &Table, path: &str) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Csv(e.to_string()))?;
    let buf = BufWriter::with_capacity(512 * 1024, file);
    let mut w = WriterBuilder::new().from_writer(buf);
    write_table(&mut w, table).map_err(|e| ExportError::Csv(e.to_string()))
}

fn write_table<W: std::io::Write>(w: &mut csv::Writer<W>, table: &Table) -> csv::Result<()> {
    w.write_record(&table.headers)?;
    for row in &table.rows {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_table;

    #[test]
    fn test_roundtrip_preserves_shape_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table {
            headers: vec!["id".into(), "market".into()],
            rows: vec![
                vec!["1".into(), "New York".into()],
                vec!["2".into(), "Florence-Myrtle Beach, SC".into()],
            ],
        };
        export_table_csv(&table, path.to_str().unwrap()).unwrap();
        let back = read_table(path.to_str().unwrap()).unwrap();
        assert_eq!(back.headers, table.headers);
        assert_eq!(back.rows, table.rows);
    }
}
