//! File Management Module
//! Copy, clean, distribute and rename drive-test CSV/Excel files.

pub mod gladiator;
mod table;
pub mod wind;

pub use table::{is_missing_cell, Table};

use crate::util::constants::MISSING_MARKER;
use crate::util::fs::has_extension;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilesError {
    #[error("{what} '{}' does not exist.", .path.display())]
    NotFound { what: &'static str, path: PathBuf },
    #[error("{0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// File type selected in the CSV/Excel check boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileKind {
    #[default]
    Csv,
    Excel,
}

impl FileKind {
    /// Extension without the dot.
    pub fn ext(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Excel => "xlsx",
        }
    }

    /// Extension with the dot, as appended to generated names.
    pub fn suffix(&self) -> &'static str {
        match self {
            FileKind::Csv => ".csv",
            FileKind::Excel => ".xlsx",
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        has_extension(path, self.ext())
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Csv => "CSV",
            FileKind::Excel => "Excel",
        }
    }
}

/// What to do with the cells of the selected columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanValue {
    /// Drop rows where the column is empty.
    Missing,
    /// Blank out cells whose text equals this value.
    Match(String),
}

impl CleanValue {
    pub fn from_input(value: &str) -> Self {
        if value == MISSING_MARKER {
            CleanValue::Missing
        } else {
            CleanValue::Match(value.to_string())
        }
    }
}

/// Cleaning applied while copying a CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRule {
    pub columns: Vec<String>,
    pub value: CleanValue,
}

impl CleanRule {
    pub fn none() -> Self {
        Self {
            columns: Vec::new(),
            value: CleanValue::Missing,
        }
    }

    /// Rule for the selected columns and a typed desired value. A blank value
    /// cleans nothing and leaves every copy as it was.
    pub fn from_form(columns: &[String], desired: &str) -> Self {
        let desired = desired.trim();
        if desired.is_empty() {
            return Self::none();
        }
        Self {
            columns: columns.to_vec(),
            value: CleanValue::from_input(desired),
        }
    }
}

/// Counters for a file operation that continues past per-item failures.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl OpReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Names of the regular files directly in `dir` with the given kind, sorted.
pub(crate) fn files_of_kind(dir: &Path, kind: FileKind) -> Result<Vec<String>, FilesError> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| kind.matches(&entry.path()))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    Ok(names)
}

/// Split a comma-separated folder list, trimming and dropping blanks.
pub fn parse_folder_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-blank lines of a multi-line text box.
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
