use anyhow::{anyhow, Result};
use image::GrayImage;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::TesseractPaths;
use crate::config::OcrConfig;

/// Represents a line of OCR text with its average word confidence
#[derive(Debug, Clone, PartialEq)]
pub struct OcrLine {
    pub text: String,
    pub confidence: f32,
}

/// Runs Tesseract on a preprocessed grayscale image.
/// Returns recognized lines in reading order.
pub fn recognize_image(
    img: &GrayImage,
    tesseract: &TesseractPaths,
    config: &OcrConfig,
) -> Result<Vec<OcrLine>> {
    // Save image to temporary file
    let temp_input = NamedTempFile::with_suffix(".png")?;
    img.save(temp_input.path())?;

    // Create temporary output file (Tesseract adds .tsv extension)
    let temp_output = NamedTempFile::new()?;
    let output_base = temp_output.path().to_string_lossy().to_string();

    // Run Tesseract with TSV output for structured data
    let output = Command::new(&tesseract.executable)
        .arg(temp_input.path())
        .arg(&output_base)
        .arg("--tessdata-dir")
        .arg(&tesseract.tessdata)
        .arg("-l")
        .arg(&config.languages)
        .arg("--psm")
        .arg(config.psm.to_string())
        .arg("tsv")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("Tesseract failed: {}", stderr));
    }

    // Read TSV output
    let tsv_path = format!("{}.tsv", output_base);
    let tsv_content = std::fs::read_to_string(&tsv_path)
        .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;

    // Clean up output file
    let _ = std::fs::remove_file(&tsv_path);

    Ok(parse_tsv_output(&tsv_content))
}

/// Accumulates the words of one TSV line.
#[derive(Default)]
struct LineBuilder {
    words: Vec<String>,
    conf_sum: f32,
}

impl LineBuilder {
    fn finish(self) -> Option<OcrLine> {
        if self.words.is_empty() {
            return None;
        }
        Some(OcrLine {
            confidence: self.conf_sum / self.words.len() as f32,
            text: self.words.join(" "),
        })
    }
}

/// Parses Tesseract TSV output into lines.
///
/// Words are grouped by (block, paragraph, line); line numbers restart in
/// every paragraph. Empty words and words with negative confidence are dropped.
fn parse_tsv_output(tsv: &str) -> Vec<OcrLine> {
    let mut lines: Vec<OcrLine> = Vec::new();
    let mut current_key: Option<(i32, i32, i32)> = None;
    let mut current = LineBuilder::default();

    for row in tsv.lines().skip(1) {
        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        // Level 5 = word
        if level != 5 {
            continue;
        }

        let key = (
            fields[2].parse().unwrap_or(-1),
            fields[3].parse().unwrap_or(-1),
            fields[4].parse().unwrap_or(-1),
        );
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        let text = fields[11].trim();

        if text.is_empty() || conf < 0.0 {
            continue;
        }

        if current_key != Some(key) {
            if let Some(line) = std::mem::take(&mut current).finish() {
                lines.push(line);
            }
            current_key = Some(key);
        }

        current.words.push(text.to_string());
        current.conf_sum += conf;
    }

    // Don't forget the last line
    if let Some(line) = current.finish() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: i32, par: i32, line: i32, conf: f32, text: &str) -> String {
        format!("5\t1\t{}\t{}\t{}\t1\t0\t0\t10\t10\t{}\t{}", block, par, line, conf, text)
    }

    #[test]
    fn test_groups_words_into_lines() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t".to_string(),
            word(1, 1, 1, 90.0, "Вы"),
            word(1, 1, 1, 80.0, "вылечили"),
            word(1, 1, 2, 95.0, "Палето-Бэй"),
        ]
        .join("\n");

        let lines = parse_tsv_output(&tsv);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Вы вылечили");
        assert!((lines[0].confidence - 85.0).abs() < 0.001);
        assert_eq!(lines[1].text, "Палето-Бэй");
    }

    #[test]
    fn test_line_numbers_restart_per_block() {
        let tsv = [
            HEADER.to_string(),
            word(1, 1, 1, 90.0, "first"),
            word(2, 1, 1, 90.0, "second"),
        ]
        .join("\n");

        let lines = parse_tsv_output(&tsv);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn test_skips_empty_and_unconfident_words() {
        let tsv = [
            HEADER.to_string(),
            word(1, 1, 1, -1.0, "ghost"),
            word(1, 1, 1, 70.0, " "),
            word(1, 1, 1, 70.0, "14:05"),
        ]
        .join("\n");

        let lines = parse_tsv_output(&tsv);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "14:05");
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_tsv_output(HEADER).is_empty());
        assert!(parse_tsv_output("").is_empty());
    }
}
