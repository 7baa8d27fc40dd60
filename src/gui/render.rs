//! GUI rendering functions.
//!
//! Contains UI layout and component rendering logic.

use eframe::egui::{self, Color32, RichText};

use super::state::{GuiState, PipelineStatus};

/// Button pressed in the controls section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Run,
    Recognize,
    Sort,
    Stop,
}

/// Render the folder inputs.
pub fn render_paths(ui: &mut egui::Ui, state: &mut GuiState) {
    ui.heading("Folders");
    ui.add_space(8.0);

    egui::Grid::new("paths_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            let fields = [
                ("Screenshots:", &mut state.images_dir),
                ("Texts:", &mut state.texts_dir),
                ("Sorted output:", &mut state.output_dir),
                ("Locations file:", &mut state.locations_file),
            ];
            for (label, value) in fields {
                ui.label(label);
                ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
                ui.end_row();
            }
        });
}

/// Render the pipeline buttons.
/// Returns the pressed button, if any.
pub fn render_controls(ui: &mut egui::Ui, state: &mut GuiState) -> Option<ControlAction> {
    let mut action = None;
    let is_running = state.status.is_running();

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.add_enabled_ui(!is_running, |ui| {
        ui.checkbox(&mut state.force, "Recognize screenshots that already have text");
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!is_running, |ui| {
            if ui.button(RichText::new("▶ Run all").size(16.0)).clicked() {
                action = Some(ControlAction::Run);
            }
            if ui.button("Recognize only").clicked() {
                action = Some(ControlAction::Recognize);
            }
            if ui.button("Sort only").clicked() {
                action = Some(ControlAction::Sort);
            }
        });

        ui.add_space(20.0);

        // Stop button - enabled only while running
        ui.add_enabled_ui(is_running, |ui| {
            if ui.button(RichText::new("◼ Stop").size(16.0)).clicked() {
                action = Some(ControlAction::Stop);
            }
        });
    });

    action
}

/// Render the progress display section.
pub fn render_progress(ui: &mut egui::Ui, state: &GuiState) {
    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Status:");

        let status_color = match &state.status {
            PipelineStatus::Idle => Color32::GRAY,
            PipelineStatus::Running { .. } => Color32::from_rgb(0, 120, 200),
            PipelineStatus::Completed(_) => Color32::from_rgb(0, 150, 0),
            PipelineStatus::Aborted(_) => Color32::from_rgb(200, 150, 0),
            PipelineStatus::Error(_) => Color32::from_rgb(200, 0, 0),
        };

        ui.label(RichText::new(state.status.status_text()).color(status_color));
    });

    ui.add_space(8.0);
    let progress_bar = egui::ProgressBar::new(state.status.progress())
        .show_percentage()
        .animate(state.status.is_running());
    ui.add(progress_bar);

    if let Some(elapsed) = state.status.elapsed_text() {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Elapsed:");
            ui.label(elapsed);
        });
    }
}

/// Render the scoring inputs and the last report.
/// Returns (count_clicked, open_folder_clicked).
pub fn render_score(ui: &mut egui::Ui, state: &mut GuiState) -> (bool, bool) {
    let mut count_clicked = false;
    let mut open_folder_clicked = false;

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.heading("Score");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Target total:");
        ui.add(
            egui::DragValue::new(&mut state.target_total)
                .range(1..=1_000_000)
                .speed(1.0),
        );
        ui.add_space(12.0);
        ui.label("Reanimation share:");
        ui.add(
            egui::DragValue::new(&mut state.ratio_percent)
                .range(1..=100)
                .suffix("%"),
        );
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.add_enabled_ui(!state.status.is_running(), |ui| {
            if ui.button("Count points").clicked() {
                count_clicked = true;
            }
        });
        ui.add_space(20.0);
        if ui.button("📁 Open sorted folder").clicked() {
            open_folder_clicked = true;
        }
    });

    if !state.report_lines.is_empty() {
        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            for line in &state.report_lines {
                ui.label(RichText::new(line).monospace());
            }
        });
    }

    (count_clicked, open_folder_clicked)
}
