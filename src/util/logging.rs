//! Logging Setup
//! Structured logging through `tracing`, filtered at runtime.
//!
//! Priority: RUST_LOG env var > `--debug` flag > settings level > "info".

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber. Safe to call once per process.
pub fn init(debug_flag: bool, settings_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = settings_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Logging initialised"
    );
}
