//! Picture Panel
//! Shared front end of the "Picture Alignment" and "Border Weight" tools.

use super::widgets::{action_button, group, log_pane, section_header, LABEL_WIDTH};
use super::worker::{JobOutcome, JobSlot};
use dts_toolkit::pptx::{collect_pptx_in_folder, process_presentations, PictureTool};
use dts_toolkit::settings::PictureSettings;
use dts_toolkit::util::fs::display_name;
use egui::{Color32, ComboBox, RichText, ScrollArea};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PictureMode {
    Align,
    Border,
}

impl PictureMode {
    fn tool(&self, weight_pt: f64) -> PictureTool {
        match self {
            PictureMode::Align => PictureTool::Align { weight_pt },
            PictureMode::Border => PictureTool::Border { weight_pt },
        }
    }

    fn id(&self) -> &'static str {
        match self {
            PictureMode::Align => "align",
            PictureMode::Border => "border",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            PictureMode::Align => "Centre every picture on its slide and set its outline weight.",
            PictureMode::Border => "Give every picture a solid black outline.",
        }
    }
}

pub struct PicturePanel {
    mode: PictureMode,
    weights: &'static [f64],
    pub form: PictureSettings,
    pub job: JobSlot,
}

impl PicturePanel {
    pub fn new(mode: PictureMode, weights: &'static [f64], form: PictureSettings) -> Self {
        Self {
            mode,
            weights,
            form,
            job: JobSlot::default(),
        }
    }

    pub fn poll(&mut self) {
        self.job.poll();
    }

    fn start(&mut self) {
        if self.form.files.is_empty() {
            self.job.reset();
            self.job.log.push("Please select at least one file.".into());
            return;
        }

        let paths = self.form.files.clone();
        let tool = self.mode.tool(self.form.weight_pt);
        self.job.spawn(move |log| {
            let report = process_presentations(&paths, tool, log).map_err(|e| e.to_string())?;
            let message = if report.is_success() {
                format!(
                    "{} presentation(s) updated, {} picture(s) edited",
                    report.processed, report.pictures
                )
            } else {
                format!(
                    "{} of {} presentation(s) failed",
                    report.failed,
                    report.processed + report.failed
                )
            };
            Ok(JobOutcome::Done {
                message,
                ok: report.is_success(),
            })
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let idle = !self.job.is_running();
        ui.label(RichText::new(self.mode.description()).color(Color32::GRAY));

        section_header(ui, "📁 Presentations");
        group(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.button("📂 Select Files").clicked() {
                    if let Some(files) = rfd::FileDialog::new()
                        .add_filter("PowerPoint", &["pptx"])
                        .pick_files()
                    {
                        self.form.files = files;
                    }
                }
                if ui.button("📂 Add Folder").clicked() {
                    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                        match collect_pptx_in_folder(&dir) {
                            Ok(found) => {
                                for path in found {
                                    if !self.form.files.contains(&path) {
                                        self.form.files.push(path);
                                    }
                                }
                            }
                            Err(e) => self.job.log.push(format!("Failed to list {}: {e}", dir.display())),
                        }
                    }
                }
                if ui.small_button("Clear").clicked() {
                    self.form.files.clear();
                }
            });

            ui.add_space(4.0);
            ScrollArea::vertical()
                .id_salt(format!("{}_files", self.mode.id()))
                .max_height(140.0)
                .show(ui, |ui| {
                    if self.form.files.is_empty() {
                        ui.label(RichText::new("No file selected").color(Color32::GRAY));
                    }
                    let mut remove = None;
                    for (i, path) in self.form.files.iter().enumerate() {
                        ui.horizontal(|ui| {
                            if ui.small_button("✖").on_hover_text("Remove").clicked() {
                                remove = Some(i);
                            }
                            ui.label(display_name(path)).on_hover_text(path.display().to_string());
                        });
                    }
                    if let Some(i) = remove {
                        self.form.files.remove(i);
                    }
                });
        });

        section_header(ui, "⚙️ Options");
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Line weight (pt):"));
            ComboBox::from_id_salt(format!("{}_weight", self.mode.id()))
                .width(100.0)
                .selected_text(format!("{}", self.form.weight_pt))
                .show_ui(ui, |ui| {
                    for &weight in self.weights {
                        ui.selectable_value(&mut self.form.weight_pt, weight, format!("{weight}"));
                    }
                });
        });

        ui.add_space(10.0);
        if action_button(ui, "▶ Execute", idle) {
            self.start();
        }

        log_pane(ui, &format!("{}_log", self.mode.id()), &self.job);
    }
}
