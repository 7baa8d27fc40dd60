//! File counting over the sorted folder tree.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::table::ScoreTable;
use crate::classify::{Category, TimeOfDay, Zone, SIMPLE_LOCATIONS};

/// One scored folder of the sorted tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// `heal/<code>` or `vaccine/<code>`
    Area {
        category: Category,
        code: &'static str,
    },
    /// `reanimation/<zone>/<time>`
    Reanimation { zone: Zone, time: TimeOfDay },
}

impl Bucket {
    /// Every scored bucket in report order: heal areas, vaccine areas, then
    /// reanimation zones with their day/night folders.
    pub fn all() -> Vec<Bucket> {
        let mut buckets = Vec::with_capacity(10);
        for category in [Category::Heal, Category::Vaccine] {
            for (_, code) in SIMPLE_LOCATIONS {
                buckets.push(Bucket::Area { category, code });
            }
        }
        for zone in Zone::ALL {
            for time in TimeOfDay::ALL {
                buckets.push(Bucket::Reanimation { zone, time });
            }
        }
        buckets
    }

    /// Folder of this bucket below the output root.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            Bucket::Area { category, code } => {
                Path::new(category.folder_name()).join(code)
            }
            Bucket::Reanimation { zone, time } => Path::new(Category::Reanimation.folder_name())
                .join(zone.as_str())
                .join(time.as_str()),
        }
    }

    /// Report label, e.g. `Heal - ELSH` or `Reanimation - City/Day`.
    pub fn label(&self) -> String {
        match self {
            Bucket::Area { category, code } => format!("{} - {}", category.title(), code),
            Bucket::Reanimation { zone, time } => {
                format!("{} - {}/{}", Category::Reanimation.title(), zone, time)
            }
        }
    }

    /// Points per file; areas missing from the table are worth 0.
    pub fn points(&self, table: &ScoreTable) -> u32 {
        match self {
            Bucket::Area {
                category: Category::Heal,
                code,
            } => table.heal_points(code).unwrap_or(0),
            Bucket::Area {
                category: Category::Vaccine,
                code,
            } => table.vaccine_points(code).unwrap_or(0),
            Bucket::Area { .. } => 0,
            Bucket::Reanimation { zone, time } => table.reanimation_points(*zone, *time),
        }
    }

    pub fn is_reanimation(&self) -> bool {
        matches!(self, Bucket::Reanimation { .. })
    }
}

/// File count and score of one bucket folder that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub label: String,
    pub folder: String,
    pub reanimation: bool,
    pub files: usize,
    pub points: u32,
    pub score: u64,
}

/// Counts regular files directly inside `folder` (subfolders are ignored).
pub fn count_files(folder: &Path) -> Result<usize> {
    let count = fs::read_dir(folder)
        .context(format!("Failed to read folder: {}", folder.display()))?
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .count();
    Ok(count)
}

/// Counts every bucket under `root`. Missing folders are skipped; unreadable
/// ones are logged and skipped.
pub fn count_buckets(root: &Path, table: &ScoreTable) -> Vec<BucketCount> {
    let mut counts = Vec::new();

    for bucket in Bucket::all() {
        let relative = bucket.relative_path();
        let folder = root.join(&relative);
        if !folder.is_dir() {
            continue;
        }

        let files = match count_files(&folder) {
            Ok(files) => files,
            Err(e) => {
                crate::log(&format!("Warning: {:#}", e));
                continue;
            }
        };

        let points = bucket.points(table);
        counts.push(BucketCount {
            label: bucket.label(),
            folder: relative.to_string_lossy().replace('\\', "/"),
            reanimation: bucket.is_reanimation(),
            files,
            points,
            score: files as u64 * points as u64,
        });
    }

    counts
}
