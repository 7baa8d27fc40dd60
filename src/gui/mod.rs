//! GUI module for the application.
//!
//! Provides a graphical interface using egui/eframe. Jobs run on the pipeline
//! thread; the window only polls its progress.

pub mod render;
pub mod state;

use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui::{self, Vec2};

use crate::config::AppConfig;
use crate::pipeline::{self, Job};

use render::ControlAction;
use state::{GuiState, PipelineStatus};

/// Main GUI application struct.
pub struct GuiApp {
    /// Application state.
    state: GuiState,
    /// Configuration the folder fields are applied to.
    base_config: AppConfig,
}

impl GuiApp {
    /// Create a new GUI application instance.
    pub fn new(base_config: AppConfig) -> Self {
        Self {
            state: GuiState::from_config(&base_config),
            base_config,
        }
    }

    /// Update pipeline status by polling the pipeline runner.
    fn update_pipeline_status(&mut self) {
        let PipelineStatus::Running { start_time, .. } = &self.state.status else {
            return;
        };
        let start_time = *start_time;

        if pipeline::is_pipeline_running() {
            let (current, total) = pipeline::get_progress();
            self.state.status = PipelineStatus::Running {
                current,
                total,
                stage_description: pipeline::get_status(),
                start_time,
            };
            return;
        }

        // Job finished
        let summary = pipeline::get_status();
        self.state.status = if summary.starts_with("Failed:") {
            PipelineStatus::Error(summary)
        } else if pipeline::is_abort_requested() {
            PipelineStatus::Aborted(summary)
        } else {
            PipelineStatus::Completed(summary)
        };

        if let Some(report) = pipeline::take_last_report() {
            self.state.report_lines = report.lines();
        }
    }

    /// Start a job on the pipeline thread.
    fn start_job(&mut self, job: Job) {
        let config = self.state.job_config(&self.base_config);

        match pipeline::start_pipeline(job, config) {
            Ok(()) => {
                self.state.status = PipelineStatus::Running {
                    current: 0,
                    total: 0,
                    stage_description: "Starting...".to_string(),
                    start_time: Instant::now(),
                };
                crate::log(&format!("GUI: Started {:?}", job));
            }
            Err(e) => {
                self.state.status = PipelineStatus::Error(e.to_string());
                crate::log(&format!("GUI: Failed to start {:?}: {}", job, e));
            }
        }
    }

    fn handle_control(&mut self, action: ControlAction) {
        let force = self.state.force;
        match action {
            ControlAction::Run => self.start_job(Job::Run { force }),
            ControlAction::Recognize => self.start_job(Job::Recognize { force }),
            ControlAction::Sort => self.start_job(Job::Sort),
            ControlAction::Stop => {
                pipeline::request_abort();
                crate::log("GUI: Requested pipeline abort");
            }
        }
    }

    /// Handle open folder button click.
    fn handle_open_folder(&self) {
        let path = Path::new(self.state.output_dir.trim());
        if let Err(e) = open_in_file_manager(path) {
            crate::log(&format!("GUI: Failed to open folder: {}", e));
        }
    }
}

/// Opens a folder in the platform file manager.
fn open_in_file_manager(path: &Path) -> std::io::Result<()> {
    let program = if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    std::process::Command::new(program).arg(path).spawn()?;
    Ok(())
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_pipeline_status();

        // Request repaint while a job is running (for progress updates)
        if self.state.status.is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Screenshot Sorter");
            ui.add_space(16.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                render::render_paths(ui, &mut self.state);

                if let Some(action) = render::render_controls(ui, &mut self.state) {
                    self.handle_control(action);
                }

                render::render_progress(ui, &self.state);

                let (count_clicked, open_folder_clicked) =
                    render::render_score(ui, &mut self.state);

                if count_clicked {
                    let job = Job::Score {
                        target_total: self.state.target_total,
                        ratio_percent: self.state.ratio_percent,
                    };
                    self.start_job(job);
                }
                if open_folder_clicked {
                    self.handle_open_folder();
                }
            });
        });
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(config: AppConfig) -> eframe::Result<()> {
    crate::log("GUI: Creating native options...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(640.0, 620.0))
            .with_min_inner_size(Vec2::new(420.0, 400.0))
            .with_title("Screenshot Sorter"),
        ..Default::default()
    };

    eframe::run_native(
        "Screenshot Sorter",
        options,
        Box::new(|_cc| {
            crate::log("GUI: Creating GuiApp instance...");
            Ok(Box::new(GuiApp::new(config)))
        }),
    )
}
