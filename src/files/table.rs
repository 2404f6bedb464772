//! Text Table
//! A CSV file held as text cells so a copy keeps every value exactly as
//! written, apart from the cells a clean rule touches.

use super::{CleanRule, CleanValue, FileKind, FilesError};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Cell texts read as "missing" (the usual spreadsheet NA spellings).
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Worksheet limits of the xlsx format.
const MAX_SHEET_COLUMNS: usize = 16_384;
const MAX_SHEET_ROWS: usize = 1_048_576;

fn sheet_col(col: usize) -> Result<u16, FilesError> {
    u16::try_from(col)
        .ok()
        .filter(|c| usize::from(*c) < MAX_SHEET_COLUMNS)
        .ok_or_else(|| FilesError::Validation(format!("Column {} is beyond the worksheet limit.", col + 1)))
}

pub fn is_missing_cell(cell: &str) -> bool {
    NA_TOKENS.contains(&cell.trim())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn read_csv(path: &Path) -> Result<Self, FilesError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Apply a clean rule. Returns the rule columns this table does not have.
    pub fn apply(&mut self, rule: &CleanRule) -> Vec<String> {
        let mut absent = Vec::new();

        for column in &rule.columns {
            let Some(idx) = self.column_index(column) else {
                absent.push(column.clone());
                continue;
            };

            match &rule.value {
                CleanValue::Missing => {
                    self.rows
                        .retain(|row| row.get(idx).map(|c| !is_missing_cell(c)).unwrap_or(false));
                }
                CleanValue::Match(value) => {
                    for cell in self.rows.iter_mut().filter_map(|row| row.get_mut(idx)) {
                        if *cell == *value {
                            cell.clear();
                        }
                    }
                }
            }
        }

        absent
    }

    pub fn write(&self, path: &Path, kind: FileKind) -> Result<(), FilesError> {
        match kind {
            FileKind::Csv => self.write_csv(path),
            FileKind::Excel => self.write_xlsx(path),
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), FilesError> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Numeric-looking cells become numbers, blanks stay empty.
    pub fn write_xlsx(&self, path: &Path) -> Result<(), FilesError> {
        let widest = self.rows.iter().map(Vec::len).chain([self.headers.len()]).max().unwrap_or(0);
        if widest > MAX_SHEET_COLUMNS {
            return Err(FilesError::Validation(format!(
                "{widest} columns do not fit in a worksheet (limit {MAX_SHEET_COLUMNS})."
            )));
        }
        if self.rows.len() >= MAX_SHEET_ROWS {
            return Err(FilesError::Validation(format!(
                "{} rows do not fit in a worksheet (limit {}).",
                self.rows.len(),
                MAX_SHEET_ROWS - 1
            )));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, sheet_col(col)?, header, &bold)?;
        }

        for (r, row) in self.rows.iter().enumerate() {
            let r = r as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let col = sheet_col(col)?;
                match cell.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => worksheet.write_number(r, col, n)?,
                    _ => worksheet.write_string(r, col, cell)?,
                };
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}
