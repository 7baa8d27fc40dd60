//! Scoring of the sorted folder tree.
//!
//! This module provides:
//! - The point table per bucket
//! - File counting per bucket folder
//! - Total and reanimation-ratio goal analysis
//! - Text report and JSON export

pub mod counter;
pub mod export;
pub mod report;
pub mod table;

pub use report::ScoreReport;
pub use table::ScoreTable;

use anyhow::{anyhow, Result};
use std::path::Path;

/// Counts and scores the sorted tree under `root`.
pub fn score_tree(
    root: &Path,
    table: &ScoreTable,
    target_total: u64,
    target_ratio_percent: u32,
) -> Result<ScoreReport> {
    if !root.is_dir() {
        return Err(anyhow!("Sorted folder not found: {}", root.display()));
    }

    let buckets = counter::count_buckets(root, table);
    crate::log(&format!(
        "Counted {} bucket folders under {}",
        buckets.len(),
        root.display()
    ));

    Ok(ScoreReport::new(buckets, target_total, target_ratio_percent))
}

/// Scores the tree and saves the text report and, if given, the JSON export.
pub fn generate_report(
    root: &Path,
    table: &ScoreTable,
    target_total: u64,
    target_ratio_percent: u32,
    report_path: &Path,
    json_path: Option<&Path>,
) -> Result<ScoreReport> {
    let report = score_tree(root, table, target_total, target_ratio_percent)?;

    report.write_text(report_path)?;
    crate::log(&format!("Score report saved: {}", report_path.display()));

    if let Some(json_path) = json_path {
        export::export_to_json(&report, json_path)?;
        crate::log(&format!("Score JSON saved: {}", json_path.display()));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn add_files(root: &Path, relative: &str, count: usize) {
        let folder = root.join(relative);
        fs::create_dir_all(&folder).unwrap();
        for i in 0..count {
            fs::write(folder.join(format!("{}.png", i)), b"x").unwrap();
        }
    }

    #[test]
    fn test_score_is_count_times_points() {
        let dir = tempdir().unwrap();
        add_files(dir.path(), "heal/ELSH", 4);
        add_files(dir.path(), "vaccine/Sandy-Shores", 2);
        add_files(dir.path(), "reanimation/City/Night", 3);
        add_files(dir.path(), "reanimation/NotCity/Day", 1);

        let report = score_tree(dir.path(), &ScoreTable::default(), 100, 70).unwrap();
        // 4*1 + 2*5 + 3*5 + 1*4
        assert_eq!(report.total_score, 33);
        assert_eq!(report.reanimation_score, 19);
    }

    #[test]
    fn test_generate_report_writes_files() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("output_images");
        add_files(&root, "reanimation/City/Day", 2);

        let report_path = dir.path().join("report.txt");
        let json_path = dir.path().join("report.json");
        let report = generate_report(
            &root,
            &ScoreTable::default(),
            10,
            70,
            &report_path,
            Some(&json_path),
        )
        .unwrap();

        assert_eq!(report.total_score, 6);
        let text = fs::read_to_string(&report_path).unwrap();
        assert!(text.contains("Reanimation - City/Day: 2 files x 3 pts = 6"));
        assert!(json_path.exists());
    }

    #[test]
    fn test_empty_tree_scores_zero() {
        let dir = tempdir().unwrap();
        let report = score_tree(dir.path(), &ScoreTable::default(), 10, 70).unwrap();
        assert_eq!(report.total_score, 0);
        assert!(report.goals.is_none());
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempdir().unwrap();
        assert!(score_tree(&dir.path().join("missing"), &ScoreTable::default(), 10, 70).is_err());
    }
}
