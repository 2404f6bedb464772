//! KPI Coverage Panel
//! Column and threshold selection, the coverage run, and its result as a
//! table plus a bar chart.

use super::widgets::{action_button, group, log_pane, section_header, LABEL_WIDTH};
use super::worker::{JobOutcome, JobSlot};
use dts_toolkit::data::DataLoader;
use dts_toolkit::kpi::{run_coverage, CoverageQuery, CoverageRow};
use dts_toolkit::settings::KpiSettings;
use dts_toolkit::util::constants::{
    cinr_threshold_presets, rsrp_threshold_presets, PRESET_CINR_COLUMNS, PRESET_RSRP_COLUMNS,
};
use egui::{Color32, ComboBox, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, Legend, Plot};
use std::path::PathBuf;

const RSRP_COLOR: Color32 = Color32::from_rgb(52, 152, 219);
const CINR_COLOR: Color32 = Color32::from_rgb(46, 204, 113);

/// Editable text box with a drop-down of suggestions beside it.
fn suggest_box(ui: &mut egui::Ui, id: &str, value: &mut String, options: &[String], width: f32) {
    ui.add(egui::TextEdit::singleline(value).desired_width(width));
    ComboBox::from_id_salt(id)
        .width(20.0)
        .selected_text("")
        .show_ui(ui, |ui| {
            if ui.selectable_label(value.is_empty(), "(none)").clicked() {
                value.clear();
            }
            for option in options {
                if ui.selectable_label(value == option, option).clicked() {
                    *value = option.clone();
                }
            }
        });
}

pub struct KpiPanel {
    pub form: KpiSettings,
    directory: String,
    /// Numeric columns found by "Inspect CSV", offered next to the presets.
    discovered: Vec<String>,
    results: Vec<CoverageRow>,
    output: Option<PathBuf>,
    pub job: JobSlot,
}

impl KpiPanel {
    pub fn new(form: KpiSettings) -> Self {
        let directory = form
            .last_dir
            .as_ref()
            .map(|d| d.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            form,
            directory,
            discovered: Vec::new(),
            results: Vec::new(),
            output: None,
            job: JobSlot::default(),
        }
    }

    pub fn poll(&mut self) {
        if let Some(JobOutcome::Coverage { report, output }) = self.job.poll() {
            self.results = report.rows;
            self.output = Some(output);
        }
    }

    /// Clear every field and the previous result.
    pub fn refresh(&mut self) {
        if self.job.is_running() {
            return;
        }
        self.form = KpiSettings::default();
        self.directory.clear();
        self.discovered.clear();
        self.results.clear();
        self.output = None;
        self.job.reset();
    }

    fn options(&self, presets: &[&str]) -> Vec<String> {
        let mut options: Vec<String> = presets.iter().map(|s| s.to_string()).collect();
        for column in &self.discovered {
            if !options.contains(column) {
                options.push(column.clone());
            }
        }
        options
    }

    fn inspect_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        let mut loader = DataLoader::new();
        let loaded = loader.load_csv(&path).map(|_| ());
        match loaded {
            Ok(()) => {
                self.discovered = loader.get_numeric_columns();
                if let Some(summary) = loader.summary() {
                    self.job.log.push(summary);
                }
            }
            Err(e) => self.job.log.push(format!("Failed to read {}: {e}", path.display())),
        }
    }

    fn start(&mut self) {
        self.results.clear();
        self.output = None;

        let query = CoverageQuery::from_form(
            &self.form.rsrp_columns,
            &self.form.cinr_columns,
            &self.form.rsrp_threshold,
            &self.form.cinr_threshold,
        );
        let directory = self.directory.trim().to_string();
        if !directory.is_empty() {
            self.form.last_dir = Some(PathBuf::from(&directory));
        }

        self.job.spawn(move |log| {
            if directory.is_empty() {
                return Err("Invalid directory selected.".to_string());
            }
            let query = query.map_err(|e| e.to_string())?;
            let (report, output) =
                run_coverage(&PathBuf::from(directory), &query, log).map_err(|e| e.to_string())?;
            Ok(JobOutcome::Coverage { report, output })
        });
    }

    fn column_slots(&mut self, ui: &mut egui::Ui) {
        let rsrp_options = self.options(&PRESET_RSRP_COLUMNS);
        let cinr_options = self.options(&PRESET_CINR_COLUMNS);

        egui::Grid::new("kpi_columns")
            .num_columns(3)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label("");
                ui.label(RichText::new("RSRP").strong());
                ui.label(RichText::new("CINR").strong());
                ui.end_row();

                let slots = self.form.rsrp_columns.len().max(self.form.cinr_columns.len());
                for i in 0..slots {
                    ui.label(format!("Column {}:", i + 1));
                    ui.horizontal(|ui| {
                        if let Some(value) = self.form.rsrp_columns.get_mut(i) {
                            suggest_box(ui, &format!("rsrp_col_{i}"), value, &rsrp_options, 160.0);
                        }
                    });
                    ui.horizontal(|ui| {
                        if let Some(value) = self.form.cinr_columns.get_mut(i) {
                            suggest_box(ui, &format!("cinr_col_{i}"), value, &cinr_options, 160.0);
                        }
                    });
                    ui.end_row();
                }

                let rsrp_presets: Vec<String> = rsrp_threshold_presets().iter().map(|v| v.to_string()).collect();
                let cinr_presets: Vec<String> = cinr_threshold_presets().iter().map(|v| v.to_string()).collect();
                ui.label("Condition (≥):");
                ui.horizontal(|ui| {
                    suggest_box(ui, "rsrp_min", &mut self.form.rsrp_threshold, &rsrp_presets, 60.0);
                    ui.label("dBm");
                });
                ui.horizontal(|ui| {
                    suggest_box(ui, "cinr_min", &mut self.form.cinr_threshold, &cinr_presets, 60.0);
                    ui.label("dB");
                });
                ui.end_row();
            });
    }

    fn results_table(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .id_salt("kpi_results")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Grid::new("kpi_result_grid")
                    .striped(true)
                    .num_columns(4)
                    .spacing([20.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["File", "RSRP", "CINR", "Samples"] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for row in &self.results {
                            ui.label(&row.file).on_hover_text(row.path.display().to_string());
                            ui.label(RichText::new(row.rsrp_label()).color(RSRP_COLOR));
                            ui.label(RichText::new(row.cinr_label()).color(CINR_COLOR));
                            ui.label(row.rows.to_string());
                            ui.end_row();
                        }
                    });
            });
    }

    fn coverage_chart(&self, ui: &mut egui::Ui) {
        let labels: Vec<String> = self.results.iter().map(|r| r.file.clone()).collect();

        let rsrp_bars: Vec<Bar> = self
            .results
            .iter()
            .enumerate()
            .map(|(i, r)| Bar::new(i as f64 - 0.18, r.rsrp_pct as f64).width(0.35).name(&r.file))
            .collect();
        let cinr_bars: Vec<Bar> = self
            .results
            .iter()
            .enumerate()
            .map(|(i, r)| Bar::new(i as f64 + 0.18, r.cinr_pct as f64).width(0.35).name(&r.file))
            .collect();

        Plot::new("kpi_coverage_chart")
            .height(260.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(100.0)
            .y_axis_label("Coverage (%)")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < f64::EPSILON {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(rsrp_bars).name("RSRP").color(RSRP_COLOR));
                plot_ui.bar_chart(BarChart::new(cinr_bars).name("CINR").color(CINR_COLOR));
            });
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let idle = !self.job.is_running();

        section_header(ui, "📁 Data Source");
        group(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Directory:"));
                ui.add(egui::TextEdit::singleline(&mut self.directory).desired_width(420.0));
                if ui.button("📂 Browse").clicked() {
                    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                        self.directory = dir.to_string_lossy().to_string();
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(""));
                if ui
                    .button("🔍 Inspect CSV")
                    .on_hover_text("Read one CSV file and offer its numeric columns")
                    .clicked()
                {
                    self.inspect_csv();
                }
            });
        });

        section_header(ui, "🔧 Columns & Conditions");
        group(ui, |ui| self.column_slots(ui));

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if action_button(ui, "▶ Run", idle) {
                self.start();
            }
            if ui.add_enabled(idle, egui::Button::new("🔄 Refresh")).clicked() {
                self.refresh();
            }
            if let Some(output) = &self.output {
                if ui.button("📄 Open Output.xlsx").clicked() {
                    if let Err(e) = open::that(output) {
                        tracing::warn!(path = %output.display(), error = %e, "Failed to open workbook");
                        self.job.log.push(format!("Failed to open {}: {e}", output.display()));
                    }
                }
            }
        });

        if !self.results.is_empty() {
            section_header(ui, "📊 Results");
            self.results_table(ui);
            ui.add_space(6.0);
            self.coverage_chart(ui);
        }

        log_pane(ui, "kpi_log", &self.job);
    }
}
