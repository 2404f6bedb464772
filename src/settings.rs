//! Settings Module
//! Last-used form values of every tool, persisted as JSON in the platform
//! config directory (e.g. ~/.config/dts-toolkit/settings.json).

use crate::files::FileKind;
use crate::util::constants::{self, ALIGN_WEIGHTS, BORDER_WEIGHTS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureSettings {
    pub files: Vec<PathBuf>,
    pub weight_pt: f64,
}

impl PictureSettings {
    fn with_weight(weight_pt: f64) -> Self {
        Self {
            files: Vec::new(),
            weight_pt,
        }
    }
}

impl Default for PictureSettings {
    fn default() -> Self {
        Self::with_weight(ALIGN_WEIGHTS[0])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GladiatorSettings {
    pub source_root: String,
    pub destination: String,
    pub source_dir: String,
    pub folder_names: String,
    pub files_per_folder: String,
    pub num_files: String,
    pub clean_columns: Vec<String>,
    pub desired_value: String,
    pub kind: FileKind,
    pub original_names: String,
    pub new_names: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    pub source: String,
    pub target: String,
    pub folder_name: String,
    pub create_folder: bool,
    pub kind: FileKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSettings {
    pub rsrp_columns: Vec<String>,
    pub cinr_columns: Vec<String>,
    pub rsrp_threshold: String,
    pub cinr_threshold: String,
    pub last_dir: Option<PathBuf>,
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            rsrp_columns: vec![String::new(); 3],
            cinr_columns: vec![String::new(); 3],
            rsrp_threshold: String::new(),
            cinr_threshold: String::new(),
            last_dir: None,
        }
    }
}

/// Everything remembered between runs. Unknown keys are ignored and missing
/// keys take their defaults, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: Option<String>,
    pub align: PictureSettings,
    pub border: PictureSettings,
    pub gladiator: GladiatorSettings,
    pub wind: WindSettings,
    pub kpi: KpiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: None,
            align: PictureSettings::with_weight(ALIGN_WEIGHTS[0]),
            border: PictureSettings::with_weight(BORDER_WEIGHTS[0]),
            gladiator: GladiatorSettings::default(),
            wind: WindSettings::default(),
            kpi: KpiSettings::default(),
        }
    }
}

impl Settings {
    /// Platform location of settings.json, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", constants::APP_ID)
            .map(|dirs| dirs.config_dir().join(constants::SETTINGS_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load settings from `path` when it exists. A missing file yields
    /// `Ok(None)`; a corrupt one is an error the caller can report before
    /// falling back to defaults.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");

        let mut settings = Settings::default();
        settings.kpi.rsrp_columns[0] = "R0 RSRP (0)".into();
        settings.kpi.rsrp_threshold = "-105".into();
        settings.wind.kind = FileKind::Excel;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"wind": {"create_folder": true}, "future_key": 1}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(settings.wind.create_folder);
        assert_eq!(settings.border.weight_pt, 1.5);
        assert_eq!(settings.kpi.cinr_columns.len(), 3);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(Settings::load_if_present(&path).unwrap().is_none());

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Settings::load_if_present(&path),
            Err(SettingsError::Json(_))
        ));
    }
}
