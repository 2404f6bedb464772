//! KPI Module
//! RSRP/CINR coverage percentages over a directory tree of drive-test CSV
//! files, exported to a spreadsheet.

mod coverage;
mod export;

pub use coverage::{
    analyze_file, analyze_tree, coverage_percent, find_csv_files, run_coverage, CoverageQuery,
    CoverageReport, CoverageRow,
};
pub use export::export_xlsx;

use crate::data::LoaderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KpiError {
    #[error("Invalid directory selected: {}", .0.display())]
    InvalidDirectory(PathBuf),
    #[error("{0} Condition should be an integer.")]
    InvalidThreshold(&'static str),
    #[error("{0} Condition is required when {0} columns are selected.")]
    MissingThreshold(&'static str),
    #[error("Select at least one RSRP or CINR column.")]
    NoColumns,
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
