//! Pipeline runner: the recognize, sort and score stages.
//!
//! The stage functions run synchronously for the command line. The GUI starts
//! them on one background thread with `start_pipeline()` and polls the
//! progress statics below.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use crate::classify::{Classifier, ReanimationLocations};
use crate::config::AppConfig;
use crate::ocr::{recognize_directory, RecognizeSummary, TesseractRecognizer};
use crate::scoring::{generate_report, ScoreReport};
use crate::sorting::{sort_directory, SortPaths, SortSummary};

/// Global flag indicating if a pipeline is currently running.
static PIPELINE_RUNNING: AtomicBool = AtomicBool::new(false);

/// Set by the Stop button, checked between items.
static ABORT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Items processed in the current stage (for GUI progress display).
static CURRENT_ITEM: AtomicUsize = AtomicUsize::new(0);

/// Items in the current stage (for GUI progress display).
static TOTAL_ITEMS: AtomicUsize = AtomicUsize::new(0);

/// Current stage description (for GUI progress display).
static CURRENT_STATUS: Mutex<String> = Mutex::new(String::new());

/// Report of the last finished scoring job.
static LAST_REPORT: Mutex<Option<ScoreReport>> = Mutex::new(None);

/// Work the background thread should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Recognize { force: bool },
    Sort,
    /// Recognize, then sort
    Run { force: bool },
    Score { target_total: u64, ratio_percent: u32 },
}

/// Clears a running flag when the pipeline thread ends, including by panic.
struct RunningGuard(&'static AtomicBool);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            update_status("Failed: pipeline thread panicked");
        }
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Checks if a pipeline is currently running.
pub fn is_pipeline_running() -> bool {
    PIPELINE_RUNNING.load(Ordering::SeqCst)
}

/// Asks the running pipeline to stop after the current item.
pub fn request_abort() {
    ABORT_REQUESTED.store(true, Ordering::SeqCst);
    crate::log("Abort requested");
}

/// True if the current (or last) job was asked to stop.
pub fn is_abort_requested() -> bool {
    ABORT_REQUESTED.load(Ordering::SeqCst)
}

/// Gets (done, total) for the current stage.
pub fn get_progress() -> (usize, usize) {
    (
        CURRENT_ITEM.load(Ordering::SeqCst),
        TOTAL_ITEMS.load(Ordering::SeqCst),
    )
}

/// Gets the current status line.
pub fn get_status() -> String {
    CURRENT_STATUS
        .lock()
        .map(|s| s.clone())
        .unwrap_or_else(|_| "Unknown".to_string())
}

fn update_status(status: &str) {
    if let Ok(mut s) = CURRENT_STATUS.lock() {
        *s = status.to_string();
    }
}

/// Takes the report of the last scoring job, if any.
pub fn take_last_report() -> Option<ScoreReport> {
    LAST_REPORT.lock().ok().and_then(|mut r| r.take())
}

/// Progress callback for the batch loops: stores the counters and reports
/// whether the batch should continue.
fn track_progress(done: usize, total: usize) -> bool {
    CURRENT_ITEM.store(done, Ordering::SeqCst);
    TOTAL_ITEMS.store(total, Ordering::SeqCst);
    !is_abort_requested()
}

/// Runs OCR over the image folder.
pub fn run_recognize(
    config: &AppConfig,
    force: bool,
    on_progress: impl FnMut(usize, usize) -> bool,
) -> Result<RecognizeSummary> {
    let paths = &config.paths;
    if !paths.images_dir.is_dir() {
        return Err(anyhow!(
            "Image folder not found: {}",
            paths.images_dir.display()
        ));
    }

    let recognizer = TesseractRecognizer::new(&config.ocr)?;
    recognize_directory(
        &paths.images_dir,
        &paths.texts_dir,
        force,
        |image| recognizer.recognize(image),
        on_progress,
    )
}

/// Classifies every text file and copies the screenshots into the sorted tree.
pub fn run_sort(
    config: &AppConfig,
    on_progress: impl FnMut(usize, usize) -> bool,
) -> Result<SortSummary> {
    let paths = &config.paths;
    if !paths.texts_dir.is_dir() {
        return Err(anyhow!(
            "Text folder not found: {}",
            paths.texts_dir.display()
        ));
    }

    let locations_file = crate::paths::resolve_data_file(&paths.locations_file);
    let locations = ReanimationLocations::load(&locations_file)?;
    let classifier = Classifier::new(&config.matching, locations)?;

    let sort_paths = SortPaths {
        texts_dir: paths.texts_dir.clone(),
        images_dir: paths.images_dir.clone(),
        output_root: paths.output_dir.clone(),
    };
    sort_directory(
        &classifier,
        &sort_paths,
        config.routing.include_name,
        on_progress,
    )
}

/// Scores the sorted tree and saves the text and JSON reports.
pub fn run_score(config: &AppConfig, target_total: u64, ratio_percent: u32) -> Result<ScoreReport> {
    let paths = &config.paths;
    generate_report(
        &paths.output_dir,
        &config.scoring.table,
        target_total,
        ratio_percent,
        &paths.report_file,
        Some(&paths.report_json),
    )
}

/// Starts `job` in a background thread.
///
/// Returns immediately after spawning the thread.
/// Use `is_pipeline_running()` to check if it is still active.
///
/// # Errors
/// Returns an error if a pipeline is already running.
pub fn start_pipeline(job: Job, config: AppConfig) -> Result<()> {
    if PIPELINE_RUNNING.swap(true, Ordering::SeqCst) {
        return Err(anyhow!("Pipeline is already running"));
    }

    ABORT_REQUESTED.store(false, Ordering::SeqCst);
    CURRENT_ITEM.store(0, Ordering::SeqCst);
    TOTAL_ITEMS.store(0, Ordering::SeqCst);
    update_status("Starting...");

    crate::log(&format!("Starting pipeline: {:?}", job));

    thread::spawn(move || {
        let _running = RunningGuard(&PIPELINE_RUNNING);
        let status = match run_job(job, &config) {
            Ok(status) => status,
            Err(e) => {
                crate::log(&format!("Pipeline failed: {:#}", e));
                format!("Failed: {:#}", e)
            }
        };
        update_status(&status);
        crate::log("Pipeline thread finished");
    });

    Ok(())
}

/// Runs one job and returns the final status line.
fn run_job(job: Job, config: &AppConfig) -> Result<String> {
    match job {
        Job::Recognize { force } => {
            update_status("Recognizing screenshots...");
            let summary = run_recognize(config, force, track_progress)?;
            Ok(describe_recognize(&summary))
        }
        Job::Sort => {
            update_status("Sorting screenshots...");
            let summary = run_sort(config, track_progress)?;
            Ok(describe_sort(&summary))
        }
        Job::Run { force } => {
            update_status("Recognizing screenshots...");
            let recognized = run_recognize(config, force, track_progress)?;
            if is_abort_requested() {
                return Ok(describe_recognize(&recognized));
            }

            update_status("Sorting screenshots...");
            CURRENT_ITEM.store(0, Ordering::SeqCst);
            let sorted = run_sort(config, track_progress)?;
            Ok(format!(
                "{} {}",
                describe_recognize(&recognized),
                describe_sort(&sorted)
            ))
        }
        Job::Score {
            target_total,
            ratio_percent,
        } => {
            update_status("Counting points...");
            let report = run_score(config, target_total, ratio_percent)?;
            let status = format!("Total score: {}", report.total_score);
            if let Ok(mut last) = LAST_REPORT.lock() {
                *last = Some(report);
            }
            Ok(status)
        }
    }
}

pub fn describe_recognize(summary: &RecognizeSummary) -> String {
    format!(
        "Recognized {}, skipped {}, failed {}.",
        summary.recognized, summary.skipped, summary.failed
    )
}

pub fn describe_sort(summary: &SortSummary) -> String {
    format!(
        "Sorted {}, fallback {}, without image {}, failed {}.",
        summary.sorted, summary.fallback, summary.image_missing, summary.failed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_in(root: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.images_dir = root.join("images");
        config.paths.texts_dir = root.join("output_texts");
        config.paths.output_dir = root.join("output_images");
        config.paths.locations_file = root.join("gta-locations.json");
        config.paths.report_file = root.join("report.txt");
        config.paths.report_json = root.join("report.json");
        config
    }

    #[test]
    fn test_sort_then_score() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(&config.paths.images_dir).unwrap();
        fs::create_dir_all(&config.paths.texts_dir).unwrap();
        fs::write(
            &config.paths.locations_file,
            r#"{ "locations": [ { "name": "Пиллбокс-Хилл", "City": 1 } ] }"#,
        )
        .unwrap();

        fs::write(
            config.paths.texts_dir.join("shot1.txt"),
            "Вы реанимировали Иван Петров\nПиллбокс-Хилл\n23:15 01.02.2024",
        )
        .unwrap();
        fs::write(config.paths.images_dir.join("shot1.png"), b"png").unwrap();
        fs::write(config.paths.texts_dir.join("shot2.txt"), "nothing useful").unwrap();
        fs::write(config.paths.images_dir.join("shot2.png"), b"png").unwrap();

        let summary = run_sort(&config, |_, _| true).unwrap();
        assert_eq!(summary.sorted, 1);
        assert_eq!(summary.fallback, 1);

        let report = run_score(&config, 10, 70).unwrap();
        // One City/Night reanimation
        assert_eq!(report.total_score, 5);
        assert!(config.paths.report_file.exists());
        assert!(config.paths.report_json.exists());
    }

    #[test]
    fn test_missing_image_folder_is_fatal() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(run_recognize(&config, false, |_, _| true).is_err());
    }

    #[test]
    fn test_missing_locations_file_is_fatal() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        fs::create_dir_all(&config.paths.texts_dir).unwrap();
        assert!(run_sort(&config, |_, _| true).is_err());
    }

    #[test]
    fn test_running_flag_cleared_after_panic() {
        static FLAG: AtomicBool = AtomicBool::new(true);

        let result = thread::spawn(|| {
            let _running = RunningGuard(&FLAG);
            panic!("job crashed");
        })
        .join();

        assert!(result.is_err());
        assert!(!FLAG.load(Ordering::SeqCst));
        assert!(get_status().starts_with("Failed:"));
    }

    #[test]
    fn test_describe_summaries() {
        let summary = SortSummary {
            sorted: 3,
            fallback: 1,
            image_missing: 0,
            failed: 2,
        };
        assert_eq!(
            describe_sort(&summary),
            "Sorted 3, fallback 1, without image 0, failed 2."
        );
    }
}
