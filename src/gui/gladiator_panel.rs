//! Gladiator Panel
//! Copy & clean, distribute and rename for Gladiator CSV exports.

use super::widgets::{action_button, folder_row, group, kind_selector, log_pane, section_header, LABEL_WIDTH};
use super::worker::{JobOutcome, JobSlot};
use dts_toolkit::files::{gladiator, parse_folder_names, parse_lines, CleanRule, OpReport};
use dts_toolkit::settings::GladiatorSettings;
use dts_toolkit::util::constants::{MISSING_MARKER, PRESET_CLEAN_COLUMNS};
use egui::{Color32, RichText};
use std::path::PathBuf;

fn summary(report: OpReport, what: &str) -> JobOutcome {
    let message = if report.is_success() {
        format!("{} {what}", report.succeeded)
    } else {
        format!("{} {what}, {} failed", report.succeeded, report.failed)
    };
    JobOutcome::Done {
        message,
        ok: report.is_success(),
    }
}

pub struct GladiatorPanel {
    pub form: GladiatorSettings,
    custom_column: String,
    pub job: JobSlot,
}

impl GladiatorPanel {
    pub fn new(form: GladiatorSettings) -> Self {
        Self {
            form,
            custom_column: String::new(),
            job: JobSlot::default(),
        }
    }

    pub fn poll(&mut self) {
        self.job.poll();
    }

    fn start_copy(&mut self) {
        let source_root = PathBuf::from(self.form.source_root.trim());
        let destination = PathBuf::from(self.form.destination.trim());
        let kind = self.form.kind;
        let rule = CleanRule::from_form(&self.form.clean_columns, &self.form.desired_value);

        self.job.spawn(move |log| {
            gladiator::copy_and_clean(&source_root, &destination, kind, &rule, log)
                .map(|report| summary(report, "file(s) copied"))
                .map_err(|e| e.to_string())
        });
    }

    fn start_distribute(&mut self) {
        let source_dir = PathBuf::from(self.form.source_dir.trim());
        let folders = parse_folder_names(&self.form.folder_names);
        let per_folder = self.form.files_per_folder.trim().parse::<usize>();

        self.job.spawn(move |log| {
            let per_folder =
                per_folder.map_err(|_| "Number of files per folder should be an integer.".to_string())?;
            gladiator::distribute_into_folders(&source_dir, &folders, per_folder, log)
                .map(|report| summary(report, "file(s) moved"))
                .map_err(|e| e.to_string())
        });
    }

    fn start_rename(&mut self) {
        let source_dir = PathBuf::from(self.form.source_dir.trim());
        let folders = parse_folder_names(&self.form.folder_names);
        let names = parse_lines(&self.form.new_names);
        let kind = self.form.kind;

        self.job.spawn(move |log| {
            gladiator::rename_in_folders(&source_dir, &folders, &names, kind, log)
                .map(|report| summary(report, "file(s) renamed"))
                .map_err(|e| e.to_string())
        });
    }

    fn generate_template(&mut self) {
        match self.form.num_files.trim().parse::<usize>() {
            Ok(count) => {
                let (original, new) = gladiator::mapping_template(count);
                self.form.original_names = original.join("\n");
                self.form.new_names = new.join("\n");
            }
            Err(_) => {
                self.job.reset();
                self.job.log.push("Number of files should be an integer.".into());
            }
        }
    }

    fn column_picker(&mut self, ui: &mut egui::Ui) {
        ui.label("Columns to clean:");
        ui.horizontal_wrapped(|ui| {
            for preset in PRESET_CLEAN_COLUMNS {
                let mut checked = self.form.clean_columns.iter().any(|c| c == preset);
                if ui.checkbox(&mut checked, preset).changed() {
                    if checked {
                        self.form.clean_columns.push(preset.to_string());
                    } else {
                        self.form.clean_columns.retain(|c| c != preset);
                    }
                }
            }
        });

        let custom: Vec<String> = self
            .form
            .clean_columns
            .iter()
            .filter(|c| !PRESET_CLEAN_COLUMNS.contains(&c.as_str()))
            .cloned()
            .collect();
        if !custom.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for column in custom {
                    if ui.small_button(format!("✖ {column}")).clicked() {
                        self.form.clean_columns.retain(|c| *c != column);
                    }
                }
            });
        }

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.custom_column)
                    .hint_text("Other column")
                    .desired_width(200.0),
            );
            let column = self.custom_column.trim().to_string();
            if ui.small_button("Add").clicked() && !column.is_empty() {
                if !self.form.clean_columns.contains(&column) {
                    self.form.clean_columns.push(column);
                }
                self.custom_column.clear();
            }
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let idle = !self.job.is_running();

        section_header(ui, "📁 Copy & Clean");
        group(ui, |ui| {
            folder_row(ui, "Source root folder:", &mut self.form.source_root);
            folder_row(ui, "Destination folder:", &mut self.form.destination);
            kind_selector(ui, &mut self.form.kind);
            self.column_picker(ui);
            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Desired value:"));
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.desired_value)
                        .hint_text(MISSING_MARKER)
                        .desired_width(120.0),
                );
                ui.label(
                    RichText::new("\"missing\" drops rows with empty cells; blank copies unchanged")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });
            ui.add_space(4.0);
            if action_button(ui, "▶ Copy & Clean", idle) {
                self.start_copy();
            }
        });

        section_header(ui, "🗂 Distribute into Folders");
        group(ui, |ui| {
            folder_row(ui, "Source directory:", &mut self.form.source_dir);
            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Folder names:"));
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.folder_names)
                        .hint_text("North, South, East")
                        .desired_width(300.0),
                );
            });
            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Files per folder:"));
                ui.add(egui::TextEdit::singleline(&mut self.form.files_per_folder).desired_width(60.0));
            });
            ui.add_space(4.0);
            if action_button(ui, "▶ Move to Folders", idle) {
                self.start_distribute();
            }
        });

        section_header(ui, "✏ Rename in Folders");
        group(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Number of files:"));
                ui.add(egui::TextEdit::singleline(&mut self.form.num_files).desired_width(60.0));
                if ui.button("Generate Template").clicked() {
                    self.generate_template();
                }
            });
            ui.columns(2, |cols| {
                cols[0].label("Original names:");
                cols[0].add(
                    egui::TextEdit::multiline(&mut self.form.original_names)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
                cols[1].label("New names:");
                cols[1].add(
                    egui::TextEdit::multiline(&mut self.form.new_names)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
            });
            kind_selector(ui, &mut self.form.kind);
            ui.add_space(4.0);
            if action_button(ui, "▶ Rename Files", idle) {
                self.start_rename();
            }
        });

        log_pane(ui, "gladiator_log", &self.job);
    }
}
