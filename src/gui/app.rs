//! DTS Toolkit Main Application
//! Tab bar over the five tool panels; drains background jobs every frame.

use super::gladiator_panel::GladiatorPanel;
use super::kpi_panel::KpiPanel;
use super::picture_panel::{PictureMode, PicturePanel};
use super::wind_panel::WindPanel;
use dts_toolkit::settings::Settings;
use dts_toolkit::util::constants::{self, ALIGN_WEIGHTS, BORDER_WEIGHTS};
use egui::{Color32, RichText};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Align,
    Border,
    Gladiator,
    Wind,
    Kpi,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Align, Tab::Border, Tab::Gladiator, Tab::Wind, Tab::Kpi];

    fn title(&self) -> &'static str {
        match self {
            Tab::Align => "Picture Alignment",
            Tab::Border => "Border Weight",
            Tab::Gladiator => "Gladiator",
            Tab::Wind => "Wind Console",
            Tab::Kpi => "KPI Coverage",
        }
    }
}

/// Main application window.
pub struct DtsApp {
    tab: Tab,
    align: PicturePanel,
    border: PicturePanel,
    gladiator: GladiatorPanel,
    wind: WindPanel,
    kpi: KpiPanel,
    log_level: Option<String>,
    settings_path: Option<PathBuf>,
    saved: bool,
}

impl DtsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings, settings_path: Option<PathBuf>) -> Self {
        Self {
            tab: Tab::Align,
            align: PicturePanel::new(PictureMode::Align, &ALIGN_WEIGHTS, settings.align),
            border: PicturePanel::new(PictureMode::Border, &BORDER_WEIGHTS, settings.border),
            gladiator: GladiatorPanel::new(settings.gladiator),
            wind: WindPanel::new(settings.wind),
            kpi: KpiPanel::new(settings.kpi),
            log_level: settings.log_level,
            settings_path,
            saved: false,
        }
    }

    fn settings(&self) -> Settings {
        Settings {
            log_level: self.log_level.clone(),
            align: self.align.form.clone(),
            border: self.border.form.clone(),
            gladiator: self.gladiator.form.clone(),
            wind: self.wind.form.clone(),
            kpi: self.kpi.form.clone(),
        }
    }

    /// Persist the form state once per session.
    fn save_settings(&mut self) {
        if self.saved {
            return;
        }
        self.saved = true;

        let Some(path) = &self.settings_path else {
            return;
        };
        match self.settings().save(path) {
            Ok(()) => tracing::info!(path = %path.display(), "Settings saved"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to save settings"),
        }
    }

    fn any_running(&self) -> bool {
        self.align.job.is_running()
            || self.border.job.is_running()
            || self.gladiator.job.is_running()
            || self.wind.job.is_running()
            || self.kpi.job.is_running()
    }
}

impl eframe::App for DtsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.align.poll();
        self.border.poll();
        self.gladiator.poll();
        self.wind.poll();
        self.kpi.poll();

        if self.any_running() {
            ctx.request_repaint();
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.save_settings();
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("📡 {}", constants::APP_NAME))
                        .size(18.0)
                        .color(Color32::from_rgb(100, 149, 237)),
                );
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, RichText::new(tab.title()).size(14.0));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⏻ Exit").clicked() {
                        self.save_settings();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    ui.label(
                        RichText::new(format!("v{}", constants::APP_VERSION))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                });
            });
            ui.add_space(5.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(self.tab.title());
                ui.separator();
                match self.tab {
                    Tab::Align => self.align.show(ui),
                    Tab::Border => self.border.show(ui),
                    Tab::Gladiator => self.gladiator.show(ui),
                    Tab::Wind => self.wind.show(ui),
                    Tab::Kpi => self.kpi.show(ui),
                }
            });
        });
    }
}
