//! DTS Toolkit - drive-test utilities
//!
//! Opens the desktop window, or runs a single tool headless when a
//! subcommand is given.

mod cli;
mod gui;

use clap::Parser;
use dts_toolkit::settings::Settings;
use dts_toolkit::util::{constants, logging};
use eframe::egui;
use gui::DtsApp;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    let settings_path = Settings::default_path();
    let loaded = settings_path
        .as_deref()
        .map(Settings::load_if_present)
        .unwrap_or(Ok(None));
    let (settings, load_error) = match loaded {
        Ok(settings) => (settings.unwrap_or_default(), None),
        Err(e) => (Settings::default(), Some(e)),
    };

    logging::init(args.debug, settings.log_level.as_deref());
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "Ignoring unreadable settings; using defaults");
    }

    if let Some(command) = args.command {
        return match cli::run(command) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        };
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title(constants::APP_NAME),
        ..Default::default()
    };

    let result = eframe::run_native(
        constants::APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(DtsApp::new(cc, settings, settings_path)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "GUI terminated with an error");
            ExitCode::FAILURE
        }
    }
}
