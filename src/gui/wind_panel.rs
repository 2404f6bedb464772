//! Wind Console Panel
//! Lists the files of a source folder, lets the user tick some and copies
//! them under new names.

use super::widgets::{action_button, folder_row, group, kind_selector, log_pane, section_header, LABEL_WIDTH};
use super::worker::{JobOutcome, JobSlot};
use dts_toolkit::files::{parse_lines, wind};
use dts_toolkit::settings::WindSettings;
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

pub struct WindPanel {
    pub form: WindSettings,
    files: Vec<String>,
    selected: Vec<bool>,
    new_names: String,
    pub job: JobSlot,
}

impl WindPanel {
    pub fn new(form: WindSettings) -> Self {
        Self {
            form,
            files: Vec::new(),
            selected: Vec::new(),
            new_names: String::new(),
            job: JobSlot::default(),
        }
    }

    pub fn poll(&mut self) {
        self.job.poll();
    }

    fn load_files(&mut self) {
        let source = PathBuf::from(self.form.source.trim());
        match wind::list_files(&source, self.form.kind) {
            Ok(files) => {
                self.job.reset();
                self.job.log.push(format!("Found {} {} file(s).", files.len(), self.form.kind.label()));
                self.selected = vec![false; files.len()];
                self.files = files;
            }
            Err(e) => {
                self.files.clear();
                self.selected.clear();
                self.job.reset();
                self.job.log.push(e.to_string());
            }
        }
    }

    fn selected_files(&self) -> Vec<String> {
        self.files
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn start_copy(&mut self) {
        let source = PathBuf::from(self.form.source.trim());
        let target = PathBuf::from(self.form.target.trim());
        let selected = self.selected_files();
        let names = parse_lines(&self.new_names);
        let folder = self
            .form
            .create_folder
            .then(|| self.form.folder_name.trim().to_string());

        self.job.spawn(move |log| {
            let report = wind::copy_selected(&source, &target, &selected, &names, folder.as_deref(), log)
                .map_err(|e| e.to_string())?;
            let message = if report.is_success() {
                format!("{} file(s) copied", report.succeeded)
            } else {
                format!("{} file(s) copied, {} failed", report.succeeded, report.failed)
            };
            Ok(JobOutcome::Done {
                message,
                ok: report.is_success(),
            })
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let idle = !self.job.is_running();

        section_header(ui, "📁 Folders");
        group(ui, |ui| {
            folder_row(ui, "Source folder:", &mut self.form.source);
            folder_row(ui, "Target folder:", &mut self.form.target);
            kind_selector(ui, &mut self.form.kind);
            if ui.button("🔄 Load Files").clicked() {
                self.load_files();
            }
        });

        section_header(ui, "📄 Files");
        ui.columns(2, |cols| {
            cols[0].label("Select files:");
            egui::Frame::none()
                .fill(cols[0].visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(&mut cols[0], |ui| {
                    ScrollArea::vertical()
                        .id_salt("wind_files")
                        .max_height(180.0)
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            if self.files.is_empty() {
                                ui.label(RichText::new("No files loaded").color(Color32::GRAY));
                            }
                            for (name, selected) in self.files.iter().zip(self.selected.iter_mut()) {
                                ui.checkbox(selected, name);
                            }
                        });
                });
            cols[0].horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = true);
                }
                if ui.small_button("Clear All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = false);
                }
                if ui.small_button("Use as names").clicked() {
                    self.new_names = self.selected_files().join("\n");
                }
            });

            cols[1].label("New file names (one per line):");
            cols[1].add(
                egui::TextEdit::multiline(&mut self.new_names)
                    .desired_rows(9)
                    .desired_width(f32::INFINITY),
            );
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.form.create_folder, "Create new folder");
            ui.add_enabled(
                self.form.create_folder,
                egui::TextEdit::singleline(&mut self.form.folder_name)
                    .hint_text("Folder name")
                    .desired_width(LABEL_WIDTH + 60.0),
            );
        });

        ui.add_space(10.0);
        if action_button(ui, "▶ Copy Files", idle) {
            self.start_copy();
        }

        log_pane(ui, "wind_log", &self.job);
    }
}
