//! Sorting of screenshots into the category/location folder tree.
//!
//! Reads every text artifact, classifies it, and copies the screenshot with
//! the same base name into its destination folder. Failures only affect the
//! item at hand; the batch always continues.

pub mod route;

pub use route::{route, Route, FALLBACK_FOLDER};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{Classifier, EventRecord};
use crate::ocr::recognizer::{read_artifact, ARTIFACT_EXTENSION};

/// Image extensions searched for a text artifact, in order.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Result of sorting one text artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// Copied into its category folder
    Sorted(PathBuf),
    /// Copied into the fallback folder
    Fallback(PathBuf),
    /// No screenshot with the artifact's base name
    ImageMissing,
    /// Reading or copying failed
    Failed(String),
}

/// Counters for one sorting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub sorted: usize,
    pub fallback: usize,
    pub image_missing: usize,
    pub failed: usize,
}

impl SortSummary {
    fn record(&mut self, outcome: &SortOutcome) {
        match outcome {
            SortOutcome::Sorted(_) => self.sorted += 1,
            SortOutcome::Fallback(_) => self.fallback += 1,
            SortOutcome::ImageMissing => self.image_missing += 1,
            SortOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.sorted + self.fallback + self.image_missing + self.failed
    }
}

/// Folder locations for one sorting pass.
#[derive(Debug, Clone)]
pub struct SortPaths {
    pub texts_dir: PathBuf,
    pub images_dir: PathBuf,
    pub output_root: PathBuf,
}

/// Finds the screenshot matching a text artifact's base name.
///
/// Extensions are compared case-insensitively (`Shot.JPG` is found for
/// `Shot`) and tried in `IMAGE_EXTENSIONS` order.
pub fn find_image(stem: &str, images_dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(images_dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.file_stem().is_some_and(|s| s == stem))
        .collect();
    candidates.sort();

    IMAGE_EXTENSIONS.iter().find_map(|wanted| {
        candidates
            .iter()
            .find(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
            })
            .cloned()
    })
}

/// Copies `image` into the routed folder, creating it if needed.
/// An existing file with the same name is overwritten.
pub fn copy_to_route(image: &Path, route: &Route, output_root: &Path) -> Result<PathBuf> {
    let folder = route.folder(output_root);
    fs::create_dir_all(&folder)
        .context(format!("Failed to create folder: {}", folder.display()))?;

    let file_name = match image.extension() {
        Some(ext) => format!("{}.{}", route.file_stem(), ext.to_string_lossy()),
        None => route.file_stem().to_string(),
    };
    let destination = folder.join(file_name);

    fs::copy(image, &destination).context(format!(
        "Failed to copy {} to {}",
        image.display(),
        destination.display()
    ))?;

    Ok(destination)
}

/// Lists text artifacts in a directory, sorted by name.
pub fn list_artifacts(texts_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut artifacts: Vec<PathBuf> = fs::read_dir(texts_dir)
        .context(format!("Failed to read text folder: {}", texts_dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION))
        })
        .collect();
    artifacts.sort();
    Ok(artifacts)
}

/// Classifies and copies the screenshot belonging to one text artifact.
pub fn sort_one(
    artifact: &Path,
    classifier: &Classifier,
    paths: &SortPaths,
    include_name: bool,
) -> SortOutcome {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let text = match read_artifact(artifact) {
        Ok(lines) => lines.join("\n"),
        Err(e) => {
            crate::log(&format!("Error: {:#}", e));
            return SortOutcome::Failed(format!("{:#}", e));
        }
    };

    let record = classifier.classify(&text);
    let route = route(&record, &stem, include_name);

    let Some(image) = find_image(&stem, &paths.images_dir) else {
        crate::log(&format!(
            "Warning: image not found for {} ({})",
            stem,
            describe(&record)
        ));
        return SortOutcome::ImageMissing;
    };

    match copy_to_route(&image, &route, &paths.output_root) {
        Ok(destination) if route.is_fallback() => {
            crate::log(&format!(
                "Fallback: {} -> {} ({})",
                stem,
                destination.display(),
                describe(&record)
            ));
            SortOutcome::Fallback(destination)
        }
        Ok(destination) => {
            crate::log(&format!("Sorted: {} -> {}", stem, destination.display()));
            SortOutcome::Sorted(destination)
        }
        Err(e) => {
            crate::log(&format!("Error: {:#}", e));
            SortOutcome::Failed(format!("{:#}", e))
        }
    }
}

/// Sorts every text artifact in `paths.texts_dir`.
///
/// `on_progress(done, total)` is called after each item; returning false
/// stops the batch. Returns an error only if the text folder cannot be listed.
pub fn sort_directory(
    classifier: &Classifier,
    paths: &SortPaths,
    include_name: bool,
    mut on_progress: impl FnMut(usize, usize) -> bool,
) -> Result<SortSummary> {
    let artifacts = list_artifacts(&paths.texts_dir)?;
    let total = artifacts.len();
    let mut summary = SortSummary::default();

    crate::log(&format!(
        "Sorting {} text files from {} into {}",
        total,
        paths.texts_dir.display(),
        paths.output_root.display()
    ));

    for (idx, artifact) in artifacts.iter().enumerate() {
        let outcome = sort_one(artifact, classifier, paths, include_name);
        summary.record(&outcome);
        if !on_progress(idx + 1, total) {
            crate::log("Sorting aborted");
            break;
        }
    }

    crate::log(&format!(
        "Sorting done: {} sorted, {} fallback, {} without image, {} failed",
        summary.sorted, summary.fallback, summary.image_missing, summary.failed
    ));

    Ok(summary)
}

/// Short description of what was (not) recognized, for log lines.
fn describe(record: &EventRecord) -> String {
    format!(
        "category: {}, time: {}, location: {}",
        record.category,
        record
            .timestamp
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "none".to_string()),
        if record.location.is_some() { "found" } else { "none" }
    )
}
