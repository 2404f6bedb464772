//! Wind Console File Management
//! Lists the CSV or Excel files of a folder and copies a selection of them
//! under new names, optionally into a freshly created sub-folder.

use super::{files_of_kind, FileKind, FilesError, OpReport};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// File names in `source` matching `kind`, sorted.
pub fn list_files(source: &Path, kind: FileKind) -> Result<Vec<String>, FilesError> {
    if !source.is_dir() {
        return Err(FilesError::NotFound {
            what: "Source folder",
            path: source.to_path_buf(),
        });
    }
    files_of_kind(source, kind)
}

/// Copy `src` to `dst` and carry over its modification time.
///
/// Copying a file onto itself is refused, since `fs::copy` would truncate it.
fn copy_with_mtime(src: &Path, dst: &Path) -> std::io::Result<()> {
    if dst.exists() && fs::canonicalize(src)? == fs::canonicalize(dst)? {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and target are the same file",
        ));
    }
    fs::copy(src, dst)?;
    let modified = fs::metadata(src)?.modified()?;
    File::options().write(true).open(dst)?.set_modified(modified)?;
    Ok(())
}

/// Copy each selected file to the target under the matching new name.
///
/// `new_folder`, when given and not blank, is created inside `target` and
/// receives the copies.
pub fn copy_selected(
    source: &Path,
    target: &Path,
    selected: &[String],
    new_names: &[String],
    new_folder: Option<&str>,
    mut log: impl FnMut(&str),
) -> Result<OpReport, FilesError> {
    if selected.is_empty() {
        return Err(FilesError::Validation("No files selected.".into()));
    }
    if new_names.len() != selected.len() {
        return Err(FilesError::Validation(
            "Number of new filenames does not match number of selected files.".into(),
        ));
    }

    let target: PathBuf = match new_folder.map(str::trim).filter(|f| !f.is_empty()) {
        Some(folder) => {
            let dir = target.join(folder);
            fs::create_dir_all(&dir)?;
            dir
        }
        None if target.is_dir() => target.to_path_buf(),
        None => {
            return Err(FilesError::NotFound {
                what: "Target folder",
                path: target.to_path_buf(),
            })
        }
    };

    let mut report = OpReport::default();
    for (file, new_name) in selected.iter().zip(new_names) {
        let from = source.join(file);
        let to = target.join(new_name);
        match copy_with_mtime(&from, &to) {
            Ok(()) => {
                tracing::info!(from = %from.display(), to = %to.display(), "File copied");
                log(&format!("Copied '{file}' to '{}'.", to.display()));
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(from = %from.display(), error = %e, "Copy failed");
                log(&format!("Error copying '{file}': {e}"));
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
