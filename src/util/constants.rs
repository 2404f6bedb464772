//! Application Constants
//! Names, presets and file-format constants shared by the tools.

pub const APP_NAME: &str = "DTS Toolkit";
pub const APP_ID: &str = "dts-toolkit";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// EMU (English Metric Units): 914400 EMU = 1 inch, 12700 EMU = 1 point
pub const EMU_PER_POINT: f64 = 12700.0;

/// Outline weights offered by the picture alignment tool (points).
pub const ALIGN_WEIGHTS: [f64; 20] = [
    0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0,
    9.5, 10.0,
];

/// Outline weights offered by the border weight tool (points). First entry is the default.
pub const BORDER_WEIGHTS: [f64; 10] = [1.5, 1.0, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 6.0, 6.5];

pub const PRESET_RSRP_COLUMNS: [&str; 4] = ["R0 RSRP (0)", "R0 RSRP (1)", "SSB_RP (0)", "SSB_RP (1)"];
pub const PRESET_CINR_COLUMNS: [&str; 2] = ["R0 RS CINR (0)", "SSB_CINR (0)"];

/// Columns offered in the Gladiator "Columns to Clean" picker.
pub const PRESET_CLEAN_COLUMNS: [&str; 6] = [
    "Longitude",
    "Latitude",
    "RSSI (0)",
    "R0 RSRP (0)",
    "R0 RS CINR (0)",
    "Cell ID (0)",
];

/// Desired value meaning "drop rows where the column is empty".
pub const MISSING_MARKER: &str = "missing";

pub const COVERAGE_OUTPUT_FILE: &str = "Output.xlsx";

/// RSRP threshold presets: -120 to -65 dBm in steps of 5.
pub fn rsrp_threshold_presets() -> Vec<i64> {
    (-120..-60).step_by(5).collect()
}

/// CINR threshold presets: 1 to 10 dB.
pub fn cinr_threshold_presets() -> Vec<i64> {
    (1..=10).collect()
}
