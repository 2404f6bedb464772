//! Coverage Export
//! Writes the coverage table to an .xlsx workbook.

use super::{CoverageRow, KpiError};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

const HEADERS: [&str; 3] = ["File", "RSRP", "CINR"];

/// Write `File | RSRP | CINR` with one row per analysed file.
pub fn export_xlsx(rows: &[CoverageRow], path: &Path) -> Result<(), KpiError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    let name_width = rows
        .iter()
        .map(|r| r.file.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(12, 80);
    worksheet.set_column_width(0, name_width as f64)?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, &row.file)?;
        worksheet.write_string(r, 1, row.rsrp_label())?;
        worksheet.write_string(r, 2, row.cinr_label())?;
    }

    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Coverage workbook written");
    Ok(())
}
