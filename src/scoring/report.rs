//! Score totals and progress toward the total and reanimation-ratio goals.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::counter::BucketCount;

const SEPARATOR: &str = "----------------------------";

/// What deleting non-reanimation screenshots can do for the ratio goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deletion {
    /// Ratio already met
    NotNeeded,
    /// Deleting at least this many non-reanimation points meets the ratio
    Delete { points: u64 },
    /// Even deleting every non-reanimation screenshot is not enough
    Impossible,
}

/// Goal analysis, only present when the total score is above zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goals {
    pub reanimation_percent: f64,
    pub ratio_reached: bool,
    /// Extra reanimation points needed to reach the ratio; `None` when no
    /// amount is enough (a 100% target with other points present)
    pub reanimation_points_needed: Option<u64>,
    /// Points still missing to reach the target total
    pub points_to_target: u64,
    pub deletion: Deletion,
}

/// Result of scoring one sorted tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub buckets: Vec<BucketCount>,
    pub total_score: u64,
    pub reanimation_score: u64,
    pub target_total: u64,
    pub target_ratio_percent: u32,
    pub goals: Option<Goals>,
}

/// True if `reanimation / total >= percent / 100`.
fn ratio_reached(total: u64, reanimation: u64, percent: u32) -> bool {
    100 * reanimation >= percent as u64 * total
}

/// Smallest number of extra reanimation points `x` with
/// `(reanimation + x) / (total + x) >= percent / 100`.
pub fn reanimation_points_needed(total: u64, reanimation: u64, percent: u32) -> Option<u64> {
    if ratio_reached(total, reanimation, percent) {
        return Some(0);
    }
    if percent >= 100 {
        return None;
    }
    let p = percent as u64;
    let missing = p * total - 100 * reanimation;
    Some(missing.div_ceil(100 - p))
}

/// Smallest number of non-reanimation points `x` to delete so that
/// `reanimation / (total - x) >= percent / 100`.
pub fn deletion_needed(total: u64, reanimation: u64, percent: u32) -> Deletion {
    if ratio_reached(total, reanimation, percent) {
        return Deletion::NotNeeded;
    }
    // Nothing left to keep: deleting everything does not produce a ratio
    if reanimation == 0 {
        return Deletion::Impossible;
    }
    // percent > 0 here, otherwise the ratio would be reached
    let remaining = 100 * reanimation / percent as u64;
    let points = total.saturating_sub(remaining);
    if points <= total - reanimation {
        Deletion::Delete { points }
    } else {
        Deletion::Impossible
    }
}

impl ScoreReport {
    /// Sums bucket scores and evaluates both goals.
    pub fn new(buckets: Vec<BucketCount>, target_total: u64, target_ratio_percent: u32) -> Self {
        let total_score: u64 = buckets.iter().map(|b| b.score).sum();
        let reanimation_score: u64 = buckets
            .iter()
            .filter(|b| b.reanimation)
            .map(|b| b.score)
            .sum();

        let goals = (total_score > 0).then(|| Goals {
            reanimation_percent: reanimation_score as f64 / total_score as f64 * 100.0,
            ratio_reached: ratio_reached(total_score, reanimation_score, target_ratio_percent),
            reanimation_points_needed: reanimation_points_needed(
                total_score,
                reanimation_score,
                target_ratio_percent,
            ),
            points_to_target: target_total.saturating_sub(total_score),
            deletion: deletion_needed(total_score, reanimation_score, target_ratio_percent),
        });

        Self {
            buckets,
            total_score,
            reanimation_score,
            target_total,
            target_ratio_percent,
            goals,
        }
    }

    /// Report text, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["DETAILED REPORT:".to_string(), SEPARATOR.to_string()];

        for bucket in &self.buckets {
            lines.push(format!(
                "{}: {} files x {} pts = {}",
                bucket.label, bucket.files, bucket.points, bucket.score
            ));
        }

        lines.push(SEPARATOR.to_string());
        lines.push(format!("TOTAL SCORE: {}", self.total_score));

        let Some(goals) = &self.goals else {
            lines.push("No files found. Total score is 0.".to_string());
            return lines;
        };

        let ratio = self.target_ratio_percent;
        lines.push(format!(
            "Reanimation % of total: {} pts -> {:.2}%",
            self.reanimation_score, goals.reanimation_percent
        ));

        match goals.reanimation_points_needed {
            _ if goals.ratio_reached => {
                lines.push(format!("Reanimation goal of {}% achieved!", ratio))
            }
            Some(points) => lines.push(format!(
                "To reach {}% reanimation score, you need at least {} more reanimation points.",
                ratio, points
            )),
            None => lines.push(format!(
                "{}% reanimation score cannot be reached while other points remain.",
                ratio
            )),
        }

        if goals.points_to_target > 0 {
            lines.push(format!(
                "You need {} more points to reach the target total score of {}.",
                goals.points_to_target, self.target_total
            ));
        } else {
            lines.push(format!(
                "Total score target of {} reached.",
                self.target_total
            ));
        }

        match goals.deletion {
            Deletion::NotNeeded => lines.push(format!(
                "Current reanimation score already meets {}% threshold.",
                ratio
            )),
            Deletion::Delete { points } => {
                lines.push(format!(
                    "You can delete at least {} non-reanimation points ({} worth of screenshots)",
                    points, points
                ));
                lines.push(format!("   to meet the {}% reanimation threshold.", ratio));
            }
            Deletion::Impossible => lines.push(format!(
                "You cannot reach {}% reanimation threshold by deleting screenshots alone.",
                ratio
            )),
        }

        lines
    }

    /// Writes the report text to `path`.
    pub fn write_text(&self, path: &Path) -> Result<()> {
        let mut text = self.lines().join("\n");
        text.push('\n');
        fs::write(path, text).context(format!("Failed to write report: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(label: &str, reanimation: bool, files: usize, points: u32) -> BucketCount {
        BucketCount {
            label: label.to_string(),
            folder: String::new(),
            reanimation,
            files,
            points,
            score: files as u64 * points as u64,
        }
    }

    #[test]
    fn test_ratio_goal_math() {
        assert_eq!(reanimation_points_needed(100, 50, 70), Some(67));
        assert_eq!(deletion_needed(100, 50, 70), Deletion::Delete { points: 29 });
    }

    #[test]
    fn test_exact_ratio_needs_nothing() {
        assert_eq!(reanimation_points_needed(100, 70, 70), Some(0));
        assert_eq!(deletion_needed(100, 70, 70), Deletion::NotNeeded);
    }

    #[test]
    fn test_needed_points_reach_ratio() {
        let needed = reanimation_points_needed(37, 11, 70).unwrap();
        assert!(ratio_reached(37 + needed, 11 + needed, 70));
        assert!(!ratio_reached(37 + needed - 1, 11 + needed - 1, 70));
    }

    #[test]
    fn test_deletion_impossible_without_reanimation() {
        assert_eq!(deletion_needed(40, 0, 70), Deletion::Impossible);
    }

    #[test]
    fn test_full_ratio_unreachable_by_adding() {
        assert_eq!(reanimation_points_needed(10, 5, 100), None);
        assert_eq!(deletion_needed(10, 5, 100), Deletion::Delete { points: 5 });
    }

    #[test]
    fn test_report_totals() {
        let report = ScoreReport::new(
            vec![
                bucket("Heal - ELSH", false, 20, 1),
                bucket("Vaccine - Sandy-Shores", false, 6, 5),
                bucket("Reanimation - City/Day", true, 10, 3),
                bucket("Reanimation - NotCity/Night", true, 2, 6),
            ],
            200,
            70,
        );

        assert_eq!(report.total_score, 92);
        assert_eq!(report.reanimation_score, 42);

        let goals = report.goals.as_ref().unwrap();
        assert!(!goals.ratio_reached);
        assert_eq!(goals.points_to_target, 108);
        // (0.7 * 92 - 42) / 0.3 = 74.67
        assert_eq!(goals.reanimation_points_needed, Some(75));

        let lines = report.lines();
        assert_eq!(lines[0], "DETAILED REPORT:");
        assert!(lines.contains(&"Heal - ELSH: 20 files x 1 pts = 20".to_string()));
        assert!(lines.contains(&"TOTAL SCORE: 92".to_string()));
        assert!(lines.contains(&"Reanimation % of total: 42 pts -> 45.65%".to_string()));
        assert!(lines.contains(
            &"You need 108 more points to reach the target total score of 200.".to_string()
        ));
    }

    #[test]
    fn test_goals_met() {
        let report = ScoreReport::new(
            vec![
                bucket("Heal - ELSH", false, 1, 1),
                bucket("Reanimation - City/Night", true, 4, 5),
            ],
            10,
            70,
        );
        let lines = report.lines();
        assert!(lines.contains(&"Reanimation goal of 70% achieved!".to_string()));
        assert!(lines.contains(&"Total score target of 10 reached.".to_string()));
        assert!(lines.contains(
            &"Current reanimation score already meets 70% threshold.".to_string()
        ));
    }

    #[test]
    fn test_zero_total() {
        let report = ScoreReport::new(vec![bucket("Heal - ELSH", false, 0, 1)], 50, 70);
        assert!(report.goals.is_none());

        let lines = report.lines();
        assert_eq!(lines.last().unwrap(), "No files found. Total score is 0.");
        assert!(!lines.iter().any(|l| l.contains("Reanimation %")));
    }

    #[test]
    fn test_write_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let report = ScoreReport::new(Vec::new(), 50, 70);

        report.write_text(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("DETAILED REPORT:\n"));
        assert!(content.ends_with("No files found. Total score is 0.\n"));
    }
}
