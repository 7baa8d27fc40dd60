//! GUI application state management.
//!
//! Tracks folder inputs, scoring inputs and pipeline status for display.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;

/// Pipeline status for display in GUI.
#[derive(Clone, Debug, Default)]
pub enum PipelineStatus {
    /// Not running, ready to start
    #[default]
    Idle,
    /// A job is running
    Running {
        current: usize,
        total: usize,
        stage_description: String,
        start_time: Instant,
    },
    /// Job finished; holds the final status line
    Completed(String),
    /// Job was stopped by the user
    Aborted(String),
    /// Job could not start or failed
    Error(String),
}

impl PipelineStatus {
    /// Get display text for current status.
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "Idle".to_string(),
            Self::Running {
                current,
                total,
                stage_description,
                ..
            } => format!("{} ({}/{})", stage_description, current, total),
            Self::Completed(summary) => format!("Done. {}", summary),
            Self::Aborted(summary) => format!("Stopped. {}", summary),
            Self::Error(msg) => format!("Error: {}", msg),
        }
    }

    /// Get progress as fraction (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        match self {
            Self::Running { current, total, .. } if *total > 0 => *current as f32 / *total as f32,
            Self::Completed(_) => 1.0,
            _ => 0.0,
        }
    }

    /// Get elapsed time string if running.
    pub fn elapsed_text(&self) -> Option<String> {
        match self {
            Self::Running { start_time, .. } => {
                let secs = start_time.elapsed().as_secs();
                Some(format!("{:02}:{:02}", secs / 60, secs % 60))
            }
            _ => None,
        }
    }

    /// Check if a job is currently running.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// GUI application state.
#[derive(Debug)]
pub struct GuiState {
    pub images_dir: String,
    pub texts_dir: String,
    pub output_dir: String,
    pub locations_file: String,
    /// Recognize images that already have a text file
    pub force: bool,
    /// Target total score for the report
    pub target_total: u64,
    /// Required reanimation share in percent
    pub ratio_percent: u32,
    /// Current pipeline status.
    pub status: PipelineStatus,
    /// Lines of the last score report.
    pub report_lines: Vec<String>,
}

impl GuiState {
    /// Initial state with folder fields taken from the configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let paths = &config.paths;
        Self {
            images_dir: paths.images_dir.display().to_string(),
            texts_dir: paths.texts_dir.display().to_string(),
            output_dir: paths.output_dir.display().to_string(),
            locations_file: paths.locations_file.display().to_string(),
            force: false,
            target_total: 100,
            ratio_percent: config.scoring.target_ratio_percent,
            status: PipelineStatus::Idle,
            report_lines: Vec::new(),
        }
    }

    /// Configuration for the next job: `base` with the folder fields applied.
    pub fn job_config(&self, base: &AppConfig) -> AppConfig {
        let mut config = base.clone();
        config.paths.images_dir = PathBuf::from(self.images_dir.trim());
        config.paths.texts_dir = PathBuf::from(self.texts_dir.trim());
        config.paths.output_dir = PathBuf::from(self.output_dir.trim());
        config.paths.locations_file = PathBuf::from(self.locations_file.trim());
        config
    }
}
