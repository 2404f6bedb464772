//! Shared Widgets
//! Section headers, folder pickers, the log pane and status line used by
//! every tool panel.

use super::worker::JobSlot;
use dts_toolkit::files::FileKind;
use egui::{Color32, RichText, ScrollArea};

pub const LABEL_WIDTH: f32 = 140.0;

pub fn section_header(ui: &mut egui::Ui, title: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(title).size(14.0).strong());
    ui.add_space(4.0);
}

/// Framed group matching the control panel look.
pub fn group<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, add_contents)
        .inner
}

/// Label, editable path and a "Browse" button opening a folder picker.
pub fn folder_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        ui.add(egui::TextEdit::singleline(value).desired_width(420.0));
        if ui.button("📂 Browse").clicked() {
            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                *value = dir.to_string_lossy().to_string();
            }
        }
    });
}

pub fn kind_selector(ui: &mut egui::Ui, kind: &mut FileKind) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("File type:"));
        ui.radio_value(kind, FileKind::Csv, FileKind::Csv.label());
        ui.radio_value(kind, FileKind::Excel, FileKind::Excel.label());
    });
}

/// Large action button, disabled while a job runs.
pub fn action_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> bool {
    let button = egui::Button::new(RichText::new(text).size(14.0)).min_size(egui::vec2(180.0, 30.0));
    ui.add_enabled(enabled, button).clicked()
}

/// Read-only log followed by the coloured status line.
pub fn log_pane(ui: &mut egui::Ui, id: &str, job: &JobSlot) {
    section_header(ui, "📋 Log");
    group(ui, |ui| {
        ScrollArea::vertical()
            .id_salt(id)
            .max_height(180.0)
            .stick_to_bottom(true)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                if job.log.is_empty() {
                    ui.label(RichText::new("No output yet").size(11.0).color(Color32::GRAY));
                }
                for line in &job.log {
                    ui.label(RichText::new(line).monospace().size(11.0));
                }
            });
    });

    ui.add_space(5.0);
    ui.horizontal(|ui| {
        if job.is_running() {
            ui.spinner();
        }
        ui.label(RichText::new(job.status.text()).size(12.0).color(job.status.color()));
    });
}
