use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OcrConfig;
use crate::log;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Common Tesseract install locations, checked after the local dir and PATH.
const COMMON_EXECUTABLES: [&str; 4] = [
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    "/usr/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// Common tessdata locations.
const COMMON_TESSDATA: [&str; 7] = [
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
];

pub struct TesseractPaths {
    pub executable: PathBuf,
    pub tessdata: PathBuf,
}

fn executable_name() -> &'static str {
    if cfg!(windows) {
        "tesseract.exe"
    } else {
        "tesseract"
    }
}

/// Splits a Tesseract language string (`eng+rus`) into language codes.
pub fn required_languages(languages: &str) -> Vec<&str> {
    languages
        .split('+')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .collect()
}

/// True if `dir` holds a traineddata file for every language.
fn has_languages(dir: &Path, languages: &[&str]) -> bool {
    languages
        .iter()
        .all(|lang| dir.join(format!("{}.traineddata", lang)).exists())
}

/// Ensures Tesseract and the configured languages are available.
/// Missing language files are copied from a system install or downloaded.
pub fn ensure_tesseract(config: &OcrConfig) -> Result<TesseractPaths> {
    let executable = find_tesseract_executable(config)?;
    log(&format!("Tesseract found at: {}", executable.display()));

    let languages = required_languages(&config.languages);
    if languages.is_empty() {
        return Err(anyhow!("No OCR languages configured"));
    }

    let tessdata = match find_tessdata_dir(config, &languages) {
        Ok(dir) => dir,
        Err(e) if config.download_tessdata => {
            log(&format!("{}. Preparing local tessdata...", e));
            let dir = crate::paths::get_user_data_dir().join("tessdata");
            fs::create_dir_all(&dir)?;
            for lang in &languages {
                if !dir.join(format!("{}.traineddata", lang)).exists() {
                    fetch_traineddata(&dir, lang)?;
                }
            }
            dir
        }
        Err(e) => return Err(e),
    };

    log(&format!("Using tessdata at: {}", tessdata.display()));

    Ok(TesseractPaths {
        executable,
        tessdata,
    })
}

/// Copies `<lang>.traineddata` from a system install or downloads it from GitHub.
fn fetch_traineddata(tessdata_dir: &Path, lang: &str) -> Result<()> {
    let file_name = format!("{}.traineddata", lang);
    let target = tessdata_dir.join(&file_name);

    for path in &COMMON_TESSDATA {
        let candidate = Path::new(path).join(&file_name);
        if candidate.exists() {
            log(&format!("Copying {} from: {}", file_name, candidate.display()));
            fs::copy(&candidate, &target)?;
            return Ok(());
        }
    }

    log(&format!("Downloading {}...", file_name));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client
        .get(format!("{}/{}", TESSDATA_REPO, file_name))
        .header("User-Agent", "samp-screenshot-sorter")
        .send()?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}: HTTP {}",
            file_name,
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(&target)
        .context(format!("Failed to create {}", target.display()))?;
    file.write_all(&bytes)?;

    log(&format!("Downloaded {} ({} bytes)", file_name, bytes.len()));

    Ok(())
}

/// Finds the Tesseract executable: config override, local dir, PATH, common paths.
pub fn find_tesseract_executable(config: &OcrConfig) -> Result<PathBuf> {
    if let Some(path) = &config.tesseract_path {
        if path.exists() {
            return Ok(path.clone());
        }
        log(&format!(
            "Warning: configured tesseract_path does not exist: {}",
            path.display()
        ));
    }

    let local_exe = crate::paths::get_tesseract_dir().join(executable_name());
    if local_exe.exists() {
        return Ok(local_exe);
    }

    // Check PATH
    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for path in &COMMON_EXECUTABLES {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR, add it to PATH, \
         or set ocr.tesseract_path in config.json"
    ))
}

/// Finds a tessdata directory holding every requested language.
pub fn find_tessdata_dir(config: &OcrConfig, languages: &[&str]) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(dir) = &config.tessdata_dir {
        candidates.push(dir.clone());
    }
    candidates.push(crate::paths::get_tesseract_dir().join("tessdata"));
    candidates.push(crate::paths::get_user_data_dir().join("tessdata"));

    // TESSDATA_PREFIX may point at tessdata itself or at its parent
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        candidates.push(PathBuf::from(&prefix));
        candidates.push(PathBuf::from(&prefix).join("tessdata"));
    }

    candidates.extend(COMMON_TESSDATA.iter().map(PathBuf::from));

    candidates
        .into_iter()
        .find(|dir| has_languages(dir, languages))
        .ok_or_else(|| {
            anyhow!(
                "tessdata with languages [{}] not found",
                languages.join(", ")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_required_languages() {
        assert_eq!(required_languages("eng+rus"), vec!["eng", "rus"]);
        assert_eq!(required_languages(" eng + "), vec!["eng"]);
        assert!(required_languages("").is_empty());
    }

    #[test]
    fn test_has_languages() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("eng.traineddata"), b"x").unwrap();

        assert!(has_languages(dir.path(), &["eng"]));
        assert!(!has_languages(dir.path(), &["eng", "rus"]));
    }

    #[test]
    fn test_configured_tessdata_dir_preferred() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("eng.traineddata"), b"x").unwrap();
        fs::write(dir.path().join("rus.traineddata"), b"x").unwrap();

        let config = OcrConfig {
            tessdata_dir: Some(dir.path().to_path_buf()),
            ..OcrConfig::default()
        };
        let found = find_tessdata_dir(&config, &["eng", "rus"]).unwrap();
        assert_eq!(found, dir.path());
    }
}
