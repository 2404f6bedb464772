//! Batch Processing
//! Runs a picture tool over a list of presentations, logging every file and
//! moving on to the next one when a file fails.

use super::slide::{PictureEdit, Rgb};
use super::{PptxError, Presentation};
use crate::util::fs::{display_name, has_extension};
use std::fs;
use std::path::{Path, PathBuf};

/// The two picture tools offered by the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PictureTool {
    /// Centre each picture on its slide and set the outline weight.
    Align { weight_pt: f64 },
    /// Give each picture a solid black outline of the given weight.
    Border { weight_pt: f64 },
}

impl PictureTool {
    pub fn weight_pt(&self) -> f64 {
        match self {
            PictureTool::Align { weight_pt } | PictureTool::Border { weight_pt } => *weight_pt,
        }
    }

    pub fn edit(&self) -> PictureEdit {
        match *self {
            PictureTool::Align { weight_pt } => PictureEdit {
                center: true,
                line_width_pt: weight_pt,
                line_color: None,
            },
            PictureTool::Border { weight_pt } => PictureEdit {
                center: false,
                line_width_pt: weight_pt,
                line_color: Some(Rgb::BLACK),
            },
        }
    }

    fn success_message(&self, path: &Path) -> String {
        match self {
            PictureTool::Align { .. } => format!(
                "Pictures aligned to center and border weights adjusted successfully for {}",
                path.display()
            ),
            PictureTool::Border { .. } => {
                format!("Border width adjusted successfully for {}", path.display())
            }
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub pictures: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// List the `.pptx` files directly inside `dir`, sorted by name.
/// Office lock files (`~$name.pptx`) are skipped.
pub fn collect_pptx_in_folder(dir: &Path) -> Result<Vec<PathBuf>, PptxError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            has_extension(path, "pptx") && !display_name(path).starts_with("~$")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Apply `tool` to every presentation in `paths`, saving each in place.
///
/// Only an invalid weight aborts the run; per-file failures are logged and
/// counted in the report.
pub fn process_presentations(
    paths: &[PathBuf],
    tool: PictureTool,
    mut log: impl FnMut(&str),
) -> Result<BatchReport, PptxError> {
    let weight = tool.weight_pt();
    if !weight.is_finite() || weight <= 0.0 {
        return Err(PptxError::InvalidWeight(weight));
    }

    let edit = tool.edit();
    let mut report = BatchReport::default();

    for path in paths {
        log(&format!("Processing {}...", path.display()));

        let mut presentation = match Presentation::open(path) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to open presentation");
                log(&format!(
                    "Error opening the presentation {}: {}",
                    path.display(),
                    e
                ));
                report.failed += 1;
                continue;
            }
        };

        let stats = match presentation.apply(&edit) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to edit presentation");
                log(&format!(
                    "Error editing the presentation {}: {}",
                    path.display(),
                    e
                ));
                report.failed += 1;
                continue;
            }
        };

        match presentation.save() {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    slides = presentation.slide_count(),
                    pictures = stats.pictures,
                    centered = stats.centered,
                    "Presentation updated"
                );
                report.processed += 1;
                report.pictures += stats.pictures;
                log(&tool.success_message(path));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save presentation");
                log(&format!(
                    "Error saving the presentation {}: {}",
                    path.display(),
                    e
                ));
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
