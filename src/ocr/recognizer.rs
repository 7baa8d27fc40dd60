//! Recognition pass over a folder of screenshots.
//!
//! Every image gets one text artifact `<texts_dir>/<stem>.txt` holding the
//! recognized lines. Images that already have an artifact are skipped unless
//! forced, so an interrupted run can be resumed cheaply.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::engine::recognize_image;
use super::preprocess::prepare_for_ocr;
use super::setup::{ensure_tesseract, TesseractPaths};
use crate::config::OcrConfig;

/// Extension of text artifacts.
pub const ARTIFACT_EXTENSION: &str = "txt";

/// Image extensions picked up by the recognizer.
pub const RECOGNIZED_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// Mean word confidence below which a line is reported as uncertain.
const LOW_CONFIDENCE: f32 = 50.0;

/// Result of recognizing one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizeOutcome {
    /// Text artifact written with this many lines
    Recognized(usize),
    /// Artifact already existed
    Skipped,
    /// Recognition or writing failed
    Failed(String),
}

/// Counters for one recognition pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecognizeSummary {
    pub recognized: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Path of the text artifact for an image.
pub fn artifact_path(texts_dir: &Path, image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    texts_dir.join(format!("{}.{}", stem, ARTIFACT_EXTENSION))
}

/// Writes recognized lines, newline-delimited, UTF-8.
pub fn write_artifact(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, lines.join("\n"))
        .context(format!("Failed to write text file: {}", path.display()))
}

/// Reads a text artifact back into lines.
pub fn read_artifact(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read text file: {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Lists PNG/JPG images in a directory, sorted by name.
pub fn list_images(images_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = fs::read_dir(images_dir)
        .context(format!("Failed to read image folder: {}", images_dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|ext| {
                    RECOGNIZED_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
        .collect();
    images.sort();
    Ok(images)
}

/// Runs `recognize` on every image without an artifact (or every image
/// when `force` is set) and stores the result.
///
/// `on_progress(done, total)` is called after each image; returning false
/// stops the pass. Returns an error only if a folder cannot be listed or created.
pub fn recognize_directory(
    images_dir: &Path,
    texts_dir: &Path,
    force: bool,
    mut recognize: impl FnMut(&Path) -> Result<Vec<String>>,
    mut on_progress: impl FnMut(usize, usize) -> bool,
) -> Result<RecognizeSummary> {
    let images = list_images(images_dir)?;
    fs::create_dir_all(texts_dir)
        .context(format!("Failed to create text folder: {}", texts_dir.display()))?;

    let total = images.len();
    let mut summary = RecognizeSummary::default();

    crate::log(&format!(
        "Recognizing {} images from {} (force: {})",
        total,
        images_dir.display(),
        force
    ));

    for (idx, image) in images.iter().enumerate() {
        let outcome = recognize_one(image, texts_dir, force, &mut recognize);
        match outcome {
            RecognizeOutcome::Recognized(_) => summary.recognized += 1,
            RecognizeOutcome::Skipped => summary.skipped += 1,
            RecognizeOutcome::Failed(_) => summary.failed += 1,
        }
        if !on_progress(idx + 1, total) {
            crate::log("Recognition aborted");
            break;
        }
    }

    crate::log(&format!(
        "Recognition done: {} recognized, {} skipped, {} failed",
        summary.recognized, summary.skipped, summary.failed
    ));

    Ok(summary)
}

fn recognize_one(
    image: &Path,
    texts_dir: &Path,
    force: bool,
    recognize: &mut impl FnMut(&Path) -> Result<Vec<String>>,
) -> RecognizeOutcome {
    let target = artifact_path(texts_dir, image);

    if target.exists() && !force {
        crate::log(&format!("Skipped (text exists): {}", target.display()));
        return RecognizeOutcome::Skipped;
    }

    let lines = match recognize(image) {
        Ok(lines) => lines,
        Err(e) => {
            crate::log(&format!("Error: OCR failed for {}: {:#}", image.display(), e));
            return RecognizeOutcome::Failed(format!("{:#}", e));
        }
    };

    if let Err(e) = write_artifact(&target, &lines) {
        crate::log(&format!("Error: {:#}", e));
        return RecognizeOutcome::Failed(format!("{:#}", e));
    }

    crate::log(&format!(
        "Saved text from {} to {} ({} lines)",
        image.display(),
        target.display(),
        lines.len()
    ));
    RecognizeOutcome::Recognized(lines.len())
}

/// Tesseract-backed recognizer.
pub struct TesseractRecognizer {
    tesseract: TesseractPaths,
    config: OcrConfig,
}

impl TesseractRecognizer {
    /// Locates Tesseract and language data. Fails if OCR cannot run at all.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        Ok(Self {
            tesseract: ensure_tesseract(config)?,
            config: config.clone(),
        })
    }

    /// Recognizes the text lines of one screenshot.
    pub fn recognize(&self, image_path: &Path) -> Result<Vec<String>> {
        let img = image::open(image_path)
            .context(format!("Failed to load image: {}", image_path.display()))?;
        let prepared = prepare_for_ocr(&img, self.config.upscale);
        let lines = recognize_image(&prepared, &self.tesseract, &self.config)?;

        let uncertain = lines
            .iter()
            .filter(|line| line.confidence < LOW_CONFIDENCE)
            .count();
        if uncertain > 0 {
            crate::log(&format!(
                "{}: {} of {} lines recognized with low confidence",
                image_path.display(),
                uncertain,
                lines.len()
            ));
        }

        Ok(lines.into_iter().map(|line| line.text).collect())
    }
}
