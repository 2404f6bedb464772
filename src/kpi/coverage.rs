//! Coverage Calculator
//! Computes, per CSV file, the share of samples where any selected RSRP
//! (or CINR) column meets its threshold.

use super::{export_xlsx, KpiError};
use crate::data::{numeric_values, DataLoader};
use crate::util::constants::COVERAGE_OUTPUT_FILE;
use crate::util::fs::{display_name, has_extension};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Columns and lower bounds for one coverage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageQuery {
    pub rsrp_columns: Vec<String>,
    pub cinr_columns: Vec<String>,
    pub rsrp_threshold: i64,
    pub cinr_threshold: i64,
}

impl CoverageQuery {
    /// Build a query from raw form fields. Blank column slots are ignored.
    /// A threshold may only be left blank when its family has no columns.
    pub fn from_form(
        rsrp_columns: &[String],
        cinr_columns: &[String],
        rsrp_threshold: &str,
        cinr_threshold: &str,
    ) -> Result<Self, KpiError> {
        let rsrp_columns = non_blank(rsrp_columns);
        let cinr_columns = non_blank(cinr_columns);
        if rsrp_columns.is_empty() && cinr_columns.is_empty() {
            return Err(KpiError::NoColumns);
        }

        Ok(Self {
            rsrp_threshold: parse_threshold("RSRP", rsrp_threshold, !rsrp_columns.is_empty())?,
            cinr_threshold: parse_threshold("CINR", cinr_threshold, !cinr_columns.is_empty())?,
            rsrp_columns,
            cinr_columns,
        })
    }
}

fn non_blank(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_threshold(metric: &'static str, raw: &str, required: bool) -> Result<i64, KpiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return if required {
            Err(KpiError::MissingThreshold(metric))
        } else {
            Ok(0)
        };
    }
    raw.parse::<i64>()
        .map_err(|_| KpiError::InvalidThreshold(metric))
}

/// Coverage of one CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// File name shown in the report.
    pub file: String,
    pub path: PathBuf,
    /// Samples left after dropping rows with missing values.
    pub rows: usize,
    pub rsrp_pct: u32,
    pub cinr_pct: u32,
}

impl CoverageRow {
    pub fn rsrp_label(&self) -> String {
        format!("{}%", self.rsrp_pct)
    }

    pub fn cinr_label(&self) -> String {
        format!("{}%", self.cinr_pct)
    }
}

/// Result of a directory run.
#[derive(Debug, Default, Clone)]
pub struct CoverageReport {
    pub rows: Vec<CoverageRow>,
    /// Files that have none of the selected columns.
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Whole-number percentage, rounding halves to even. Zero when `total` is zero.
pub fn coverage_percent(covered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((covered as f64 / total as f64) * 100.0).round_ties_even() as u32
}

/// Every `.csv` file under `root`, sorted by path.
pub fn find_csv_files(root: &Path) -> Result<Vec<PathBuf>, KpiError> {
    if !root.is_dir() {
        return Err(KpiError::InvalidDirectory(root.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), "csv"))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Analyse one CSV file. Returns `None` when it has none of the selected columns.
pub fn analyze_file(path: &Path, query: &CoverageQuery) -> Result<Option<CoverageRow>, KpiError> {
    let df = DataLoader::read_csv_text(path)?;
    let present: HashSet<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rsrp_cols: Vec<&String> = query.rsrp_columns.iter().filter(|c| present.contains(*c)).collect();
    let cinr_cols: Vec<&String> = query.cinr_columns.iter().filter(|c| present.contains(*c)).collect();
    if rsrp_cols.is_empty() && cinr_cols.is_empty() {
        return Ok(None);
    }

    let rsrp_values = rsrp_cols
        .iter()
        .map(|c| numeric_values(&df, c))
        .collect::<Result<Vec<_>, _>>()?;
    let cinr_values = cinr_cols
        .iter()
        .map(|c| numeric_values(&df, c))
        .collect::<Result<Vec<_>, _>>()?;

    let rsrp_min = query.rsrp_threshold as f64;
    let cinr_min = query.cinr_threshold as f64;
    let (mut total, mut rsrp_hits, mut cinr_hits) = (0usize, 0usize, 0usize);

    for row in 0..df.height() {
        let complete = rsrp_values
            .iter()
            .chain(cinr_values.iter())
            .all(|col| col[row].is_some());
        if !complete {
            continue;
        }

        total += 1;
        if rsrp_values.iter().any(|col| col[row].is_some_and(|v| v >= rsrp_min)) {
            rsrp_hits += 1;
        }
        if cinr_values.iter().any(|col| col[row].is_some_and(|v| v >= cinr_min)) {
            cinr_hits += 1;
        }
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        kept = total,
        rsrp_hits,
        cinr_hits,
        "Coverage computed"
    );

    Ok(Some(CoverageRow {
        file: display_name(path),
        path: path.to_path_buf(),
        rows: total,
        rsrp_pct: coverage_percent(rsrp_hits, total),
        cinr_pct: coverage_percent(cinr_hits, total),
    }))
}

/// Analyse every CSV file under `root` in parallel, keeping path order.
pub fn analyze_tree(
    root: &Path,
    query: &CoverageQuery,
    mut log: impl FnMut(&str),
) -> Result<CoverageReport, KpiError> {
    let files = find_csv_files(root)?;
    log(&format!("Found {} CSV files under {}", files.len(), root.display()));

    let outcomes: Vec<(&PathBuf, Result<Option<CoverageRow>, KpiError>)> = files
        .par_iter()
        .map(|path| (path, analyze_file(path, query)))
        .collect();

    let mut report = CoverageReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(Some(row)) => {
                log(&format!(
                    "{}: RSRP {} / CINR {} ({} samples)",
                    row.file,
                    row.rsrp_label(),
                    row.cinr_label(),
                    row.rows
                ));
                report.rows.push(row);
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "No selected columns; skipped");
                report.skipped += 1;
            }
            Err(e) => {
                let warning = format!("Error processing {}: {}", display_name(path), e);
                tracing::warn!(path = %path.display(), error = %e, "Coverage failed");
                log(&warning);
                report.warnings.push(warning);
            }
        }
    }

    Ok(report)
}

/// Analyse `root` and write the workbook to `root/Output.xlsx`.
pub fn run_coverage(
    root: &Path,
    query: &CoverageQuery,
    mut log: impl FnMut(&str),
) -> Result<(CoverageReport, PathBuf), KpiError> {
    let report = analyze_tree(root, query, &mut log)?;
    let output = root.join(COVERAGE_OUTPUT_FILE);
    export_xlsx(&report.rows, &output)?;
    log(&format!(
        "Analysis completed. Results saved to {}",
        output.display()
    ));
    Ok((report, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn query() -> CoverageQuery {
        CoverageQuery {
            rsrp_columns: vec!["R0 RSRP (0)".into(), "R0 RSRP (1)".into()],
            cinr_columns: vec!["R0 RS CINR (0)".into()],
            rsrp_threshold: -100,
            cinr_threshold: 5,
        }
    }

    #[test]
    fn percent_rounds_half_to_even() {
        assert_eq!(coverage_percent(0, 0), 0);
        assert_eq!(coverage_percent(1, 8), 12); // 12.5
        assert_eq!(coverage_percent(3, 8), 38); // 37.5
        assert_eq!(coverage_percent(2, 3), 67);
        assert_eq!(coverage_percent(5, 5), 100);
    }

    #[test]
    fn form_validation() {
        let cols = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let q = CoverageQuery::from_form(&cols(&["R0 RSRP (0)", "", " "]), &cols(&["", "", ""]), " -110 ", "")
            .unwrap();
        assert_eq!(q.rsrp_columns, vec!["R0 RSRP (0)"]);
        assert!(q.cinr_columns.is_empty());
        assert_eq!(q.rsrp_threshold, -110);

        assert!(matches!(
            CoverageQuery::from_form(&cols(&["a"]), &cols(&[]), "-90.5", ""),
            Err(KpiError::InvalidThreshold("RSRP"))
        ));
        assert!(matches!(
            CoverageQuery::from_form(&cols(&[]), &cols(&["b"]), "", ""),
            Err(KpiError::MissingThreshold("CINR"))
        ));
        assert!(matches!(
            CoverageQuery::from_form(&cols(&["", ""]), &cols(&[""]), "1", "1"),
            Err(KpiError::NoColumns)
        ));
    }

    #[test]
    fn any_column_meeting_threshold_counts_and_incomplete_rows_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drive.csv");
        fs::write(
            &path,
            "Time,R0 RSRP (0),R0 RSRP (1),R0 RS CINR (0)\n\
             1,-105,-99,6\n\
             2,-120,-110,4\n\
             3,-90,,10\n\
             4,-100,-101,5\n",
        )
        .unwrap();

        let row = analyze_file(&path, &query()).unwrap().unwrap();
        // row 3 has a blank RSRP (1) and is dropped; rows 1 and 4 meet RSRP
        assert_eq!(row.rows, 3);
        assert_eq!(row.rsrp_pct, 67);
        assert_eq!(row.cinr_pct, 67);
        assert_eq!(row.file, "drive.csv");
    }

    #[test]
    fn family_without_present_columns_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsrp_only.csv");
        fs::write(&path, "R0 RSRP (0)\n-80\n-90\n").unwrap();

        let row = analyze_file(&path, &query()).unwrap().unwrap();
        assert_eq!(row.rsrp_pct, 100);
        assert_eq!(row.cinr_pct, 0);
    }

    #[test]
    fn file_without_selected_columns_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gps.csv");
        fs::write(&path, "Longitude,Latitude\n1,2\n").unwrap();
        assert_eq!(analyze_file(&path, &query()).unwrap(), None);
    }

    #[test]
    fn empty_file_after_drop_is_zero_percent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.csv");
        fs::write(&path, "R0 RSRP (0),R0 RS CINR (0)\n,\n").unwrap();

        let row = analyze_file(&path, &query()).unwrap().unwrap();
        assert_eq!((row.rows, row.rsrp_pct, row.cinr_pct), (0, 0, 0));
    }

    #[test]
    fn finds_csv_files_recursively_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/deeper")).unwrap();
        fs::write(dir.path().join("b/deeper/z.csv"), "x\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "x\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x\n").unwrap();

        let files = find_csv_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.CSV"), dir.path().join("b/deeper/z.csv")]);

        assert!(matches!(
            find_csv_files(&dir.path().join("missing")),
            Err(KpiError::InvalidDirectory(_))
        ));
    }
}
