//! Gladiator File Management
//! Copies one CSV per measurement folder into a flat destination, moves
//! loose CSV files into named folders, and renames them inside those folders.

use super::{files_of_kind, CleanRule, FileKind, FilesError, OpReport, Table};
use regex::Regex;
use std::fs;
use std::path::Path;

fn require_dir(what: &'static str, path: &Path) -> Result<(), FilesError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(FilesError::NotFound {
            what,
            path: path.to_path_buf(),
        })
    }
}

/// Placeholder lines for the original/new name boxes.
pub fn mapping_template(count: usize) -> (Vec<String>, Vec<String>) {
    (1..=count)
        .map(|i| (format!("Original File {i}"), format!("New File {i}")))
        .unzip()
}

/// For every sub-folder of `source_root` holding exactly one CSV file, write
/// a cleaned copy to `destination/<folder>_data.<ext>`.
pub fn copy_and_clean(
    source_root: &Path,
    destination: &Path,
    kind: FileKind,
    rule: &CleanRule,
    mut log: impl FnMut(&str),
) -> Result<OpReport, FilesError> {
    require_dir("Source root folder", source_root)?;
    require_dir("Destination folder", destination)?;

    let mut folders: Vec<String> = fs::read_dir(source_root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    folders.sort();

    let mut report = OpReport::default();
    for folder in folders {
        let folder_path = source_root.join(&folder);
        let csv_files = match files_of_kind(&folder_path, FileKind::Csv) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(folder = %folder_path.display(), error = %e, "Folder unreadable");
                log(&format!("Could not read folder '{}': {e}", folder_path.display()));
                report.failed += 1;
                continue;
            }
        };
        let [csv_name] = csv_files.as_slice() else {
            tracing::debug!(folder = %folder, count = csv_files.len(), "Folder skipped");
            report.skipped += 1;
            continue;
        };

        let source_file = folder_path.join(csv_name);
        let new_name = format!("{folder}_data{}", kind.suffix());
        let target = destination.join(&new_name);

        let outcome = Table::read_csv(&source_file).and_then(|mut table| {
            let absent = table.apply(rule);
            table.write(&target, kind)?;
            Ok(absent)
        });

        match outcome {
            Ok(absent) => {
                for column in absent {
                    log(&format!(
                        "Column '{column}' not found in '{}'; left unchanged.",
                        source_file.display()
                    ));
                }
                tracing::info!(from = %source_file.display(), to = %target.display(), "CSV copied");
                log(&format!(
                    "File '{}' copied and cleaned values for selected columns, then saved as '{new_name}'.",
                    source_file.display()
                ));
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(file = %source_file.display(), error = %e, "Copy failed");
                log(&format!(
                    "An error occurred while copying and cleaning '{}': {e}",
                    source_file.display()
                ));
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// First run of decimal digits in a file name, or 0 if there is none.
fn leading_number(pattern: &Regex, name: &str) -> u64 {
    pattern
        .find(name)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Move the CSV files of `source_dir` into `folder_names` round-robin,
/// `files_per_folder` at a time, ordered by the number in each file name.
pub fn distribute_into_folders(
    source_dir: &Path,
    folder_names: &[String],
    files_per_folder: usize,
    mut log: impl FnMut(&str),
) -> Result<OpReport, FilesError> {
    require_dir("Source directory", source_dir)?;
    if folder_names.is_empty() {
        return Err(FilesError::Validation("Enter at least one folder name.".into()));
    }
    if files_per_folder == 0 {
        return Err(FilesError::Validation(
            "Number of files per folder must be at least 1.".into(),
        ));
    }

    let pattern = Regex::new(r"\d+")?;
    let mut files = files_of_kind(source_dir, FileKind::Csv)?;
    files.sort_by_key(|name| leading_number(&pattern, name));

    let mut report = OpReport::default();
    let mut pending = files.into_iter().peekable();
    let mut folder_idx = 0;

    while pending.peek().is_some() {
        let folder_name = &folder_names[folder_idx];
        let folder_path = source_dir.join(folder_name);
        folder_idx = (folder_idx + 1) % folder_names.len();

        if let Err(e) = fs::create_dir_all(&folder_path) {
            let chunk = pending.by_ref().take(files_per_folder).count();
            tracing::warn!(folder = %folder_path.display(), error = %e, "Folder not created");
            log(&format!(
                "Failed to create folder '{folder_name}': {e}; {chunk} CSV files left in place."
            ));
            report.failed += chunk;
            continue;
        }

        let mut moved = 0;
        for file in pending.by_ref().take(files_per_folder) {
            let from = source_dir.join(&file);
            let to = folder_path.join(&file);
            if to.exists() {
                log(&format!("Failed to move '{file}': it already exists in '{folder_name}'."));
                report.failed += 1;
                continue;
            }
            match fs::rename(&from, &to) {
                Ok(()) => {
                    moved += 1;
                    report.succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(file = %from.display(), error = %e, "Move failed");
                    log(&format!("Failed to move '{file}': {e}"));
                    report.failed += 1;
                }
            }
        }

        log(&format!("Moved {moved} CSV files to folder '{folder_name}'"));
    }

    if report.is_success() {
        log("CSV files moved to folders successfully!");
    }
    Ok(report)
}

/// Rename the CSV files inside each named folder to
/// `<folder>_<desired name><ext>`, cycling through `desired_names`.
pub fn rename_in_folders(
    source_dir: &Path,
    folder_names: &[String],
    desired_names: &[String],
    kind: FileKind,
    mut log: impl FnMut(&str),
) -> Result<OpReport, FilesError> {
    require_dir("Source directory", source_dir)?;
    if folder_names.is_empty() {
        return Err(FilesError::Validation("Enter at least one folder name.".into()));
    }
    if desired_names.is_empty() {
        return Err(FilesError::Validation("Enter at least one desired new name.".into()));
    }

    let mut report = OpReport::default();
    for folder_name in folder_names {
        let folder_path = source_dir.join(folder_name);
        if !folder_path.is_dir() {
            log(&format!("Folder '{}' does not exist.", folder_path.display()));
            report.skipped += 1;
            continue;
        }

        let files = match files_of_kind(&folder_path, FileKind::Csv) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(folder = %folder_path.display(), error = %e, "Folder unreadable");
                log(&format!("Could not read folder '{}': {e}", folder_path.display()));
                report.failed += 1;
                continue;
            }
        };
        for (file, desired) in files.iter().zip(desired_names.iter().cycle()) {
            let new_name = format!("{folder_name}_{desired}{}", kind.suffix());
            if *file == new_name {
                report.succeeded += 1;
                continue;
            }

            let to = folder_path.join(&new_name);
            if to.exists() {
                log(&format!(
                    "Failed to rename '{file}' to '{new_name}': target already exists."
                ));
                report.failed += 1;
                continue;
            }

            match fs::rename(folder_path.join(file), &to) {
                Ok(()) => {
                    log(&format!("File '{file}' renamed to '{new_name}'."));
                    report.succeeded += 1;
                }
                Err(e) => {
                    log(&format!("Failed to rename '{file}' to '{new_name}': {e}"));
                    report.failed += 1;
                }
            }
        }
    }

    Ok(report)
}
