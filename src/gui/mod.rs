//! GUI module - one panel per tool, jobs on background threads

mod app;
mod gladiator_panel;
mod kpi_panel;
mod picture_panel;
mod widgets;
mod wind_panel;
mod worker;

pub use app::DtsApp;
