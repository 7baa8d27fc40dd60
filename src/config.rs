//! Application configuration.
//!
//! Loads settings from config.json at startup. Provides default folder
//! locations, fuzzy-matching thresholds, Tesseract options and the score table.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::scoring::ScoreTable;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Folder and file locations used by the pipeline stages.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory with the source screenshots
    pub images_dir: PathBuf,
    /// Directory with one recognized text file per screenshot
    pub texts_dir: PathBuf,
    /// Root of the sorted output tree (also the tree the scorer walks)
    pub output_dir: PathBuf,
    /// JSON table of reanimation locations with their City flag
    pub locations_file: PathBuf,
    /// Plain-text score report
    pub report_file: PathBuf,
    /// JSON export of the score report
    pub report_json: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            texts_dir: PathBuf::from("output_texts"),
            output_dir: PathBuf::from("output_images"),
            locations_file: PathBuf::from("gta-locations.json"),
            report_file: PathBuf::from("report.txt"),
            report_json: PathBuf::from("report.json"),
        }
    }
}

/// Similarity thresholds (0-100) for fuzzy line matching.
/// A line matches only when its score is strictly above the threshold.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Threshold for action phrases ("вы вылечили", ...)
    pub action_threshold: f64,
    /// Threshold for place names
    pub location_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            action_threshold: 80.0,
            location_threshold: 85.0,
        }
    }
}

/// Tesseract invocation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language string, `+`-separated
    pub languages: String,
    /// Page segmentation mode passed as `--psm`
    pub psm: u8,
    /// Scale factor applied before recognition (1.0 = unchanged)
    pub upscale: f32,
    /// Explicit path to the tesseract executable
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory
    pub tessdata_dir: Option<PathBuf>,
    /// Download missing traineddata files on first use
    pub download_tessdata: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "eng+rus".to_string(),
            // Sparse text: the overlay is a handful of lines scattered over the frame
            psm: 11,
            upscale: 1.0,
            tesseract_path: None,
            tessdata_dir: None,
            download_tessdata: true,
        }
    }
}

/// Options for generated file names.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Append the detected person name to sorted file names
    pub include_name: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { include_name: true }
    }
}

/// Goal and point settings for the scorer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Required share of reanimation points, in percent
    pub target_ratio_percent: u32,
    /// Points per file for every bucket
    pub table: ScoreTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            target_ratio_percent: 70,
            table: ScoreTable::default(),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub matching: MatchingConfig,
    pub ocr: OcrConfig,
    pub routing: RoutingConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Parses a configuration from JSON text. Missing fields take defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> AppConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());

    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match AppConfig::from_json(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    AppConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration.
/// Falls back to defaults if init_config() was never called.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.paths.images_dir, PathBuf::from("images"));
        assert_eq!(config.paths.texts_dir, PathBuf::from("output_texts"));
        assert_eq!(config.paths.output_dir, PathBuf::from("output_images"));
        assert_eq!(config.ocr.languages, "eng+rus");
        assert_eq!(config.scoring.target_ratio_percent, 70);
        assert!(config.routing.include_name);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "paths": { "images_dir": "E:\\samp_screens\\raw" },
            "matching": { "location_threshold": 90.0 }
        }"#;
        let config = AppConfig::from_json(json).unwrap();

        assert_eq!(config.paths.images_dir, PathBuf::from("E:\\samp_screens\\raw"));
        assert_eq!(config.paths.texts_dir, PathBuf::from("output_texts"));
        assert!((config.matching.location_threshold - 90.0).abs() < f64::EPSILON);
        assert!((config.matching.action_threshold - 80.0).abs() < f64::EPSILON);
        assert_eq!(config.ocr.psm, 11);
    }

    #[test]
    fn test_score_table_override() {
        let json = r#"{ "scoring": { "table": { "heal": { "ELSH": 7 } } } }"#;
        let config = AppConfig::from_json(json).unwrap();

        assert_eq!(config.scoring.table.heal_points("ELSH"), Some(7));
        // Unlisted areas and other sections keep their defaults
        assert_eq!(config.scoring.table.heal_points("Sandy-Shores"), Some(2));
        assert_eq!(config.scoring.table.vaccine_points("Paleto-Bay"), Some(5));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AppConfig::from_json("{ not json").is_err());
    }
}
