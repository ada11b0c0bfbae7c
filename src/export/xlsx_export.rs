//! Processed-table XLSX export: one data sheet, plus a summary sheet when
//! a run summary is available.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::error::ExportError;
use crate::ingest::Table;
use crate::summary::RunSummary;

fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

fn row_format_even() -> Format {
    Format::new().set_background_color(Color::RGB(0xF2F2F2))
}

fn xlsx_err(e: XlsxError) -> ExportError {
    ExportError::Xlsx(e.to_string())
}

pub fn export_table_xlsx(
    table: &Table,
    summary: Option<&RunSummary>,
    path: &str,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    {
        let ws = workbook.add_worksheet();
        ws.set_name("Processed").map_err(xlsx_err)?;
        write_table_sheet(ws, table).map_err(xlsx_err)?;
    }
    if let Some(summary) = summary {
        let ws = workbook.add_worksheet();
        ws.set_name("Summary").map_err(xlsx_err)?;
        write_summary_sheet(ws, summary).map_err(xlsx_err)?;
    }
    workbook.save(path).map_err(xlsx_err)?;
    Ok(())
}

fn write_table_sheet(ws: &mut Worksheet, table: &Table) -> Result<(), XlsxError> {
    let hfmt = header_format();
    for (c, header) in table.headers.iter().enumerate() {
        ws.write_string_with_format(0, c as u16, header, &hfmt)?;
    }
    let even = row_format_even();
    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        if r % 2 == 0 {
            ws.set_row_format(r, &even)?;
        }
        for (c, cell) in row.iter().enumerate() {
            ws.write_string(r, c as u16, cell)?;
        }
    }
    Ok(())
}

fn write_summary_sheet(ws: &mut Worksheet, summary: &RunSummary) -> Result<(), XlsxError> {
    let hfmt = header_format();
    ws.write_string_with_format(0, 0, "Summary", &hfmt)?;
    let mut row: u32 = 2;
    for (k, v) in summary.entries() {
        ws.write_string(row, 0, &k)?;
        ws.write_string(row, 1, &v)?;
        row += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let table = Table {
            headers: vec!["id".into(), "market".into()],
            rows: vec![vec!["1".into(), "501".into()]],
        };
        let mut summary = RunSummary::new("convert", "data.csv");
        summary.finish();
        export_table_xlsx(&table, Some(&summary), path.to_str().unwrap()).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
