use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the bundled resources directory: `<exe_dir>/resources/`
pub fn get_resources_dir() -> PathBuf {
    get_exe_dir().join("resources")
}

/// Returns the local tesseract directory: `<exe_dir>/tesseract/`
pub fn get_tesseract_dir() -> PathBuf {
    get_exe_dir().join("tesseract")
}

/// Returns the per-user data directory used for downloaded tessdata.
pub fn get_user_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("samp-screenshot-sorter")
}

/// Resolves a data file such as the locations table.
/// A relative path missing from the working directory falls back to the
/// bundled resources directory.
pub fn resolve_data_file(path: &Path) -> PathBuf {
    if path.exists() || path.is_absolute() {
        return path.to_path_buf();
    }
    let bundled = get_resources_dir().join(path);
    if bundled.exists() {
        bundled
    } else {
        path.to_path_buf()
    }
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_path_kept() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gta-locations.json");
        std::fs::write(&file, "{}").unwrap();
        assert_eq!(resolve_data_file(&file), file);
    }

    #[test]
    fn test_missing_absolute_path_kept() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.json");
        assert_eq!(resolve_data_file(&file), file);
    }
}
