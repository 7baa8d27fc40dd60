//! JSON export of the score report.

use super::report::ScoreReport;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export the score report to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_to_json(report: &ScoreReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize score report to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::counter::BucketCount;
    use tempfile::tempdir;

    #[test]
    fn test_export_to_json() {
        let report = ScoreReport::new(
            vec![
                BucketCount {
                    label: "Heal - ELSH".to_string(),
                    folder: "heal/ELSH".to_string(),
                    reanimation: false,
                    files: 50,
                    points: 1,
                    score: 50,
                },
                BucketCount {
                    label: "Reanimation - City/Day".to_string(),
                    folder: "reanimation/City/Day".to_string(),
                    reanimation: true,
                    files: 50,
                    points: 1,
                    score: 50,
                },
            ],
            120,
            70,
        );

        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        export_to_json(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"total_score\": 100"));
        assert!(content.contains("\"folder\": \"reanimation/City/Day\""));
        assert!(content.contains("\"reanimation_points_needed\": 67"));
        assert!(content.contains("\"kind\": \"delete\""));
        assert!(content.contains("\"points\": 29"));
    }

    #[test]
    fn test_zero_total_has_no_goals() {
        let report = ScoreReport::new(Vec::new(), 10, 70);
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");

        export_to_json(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"goals\": null"));
    }
}
