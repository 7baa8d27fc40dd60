use std::path::{Path, PathBuf};

use crate::classify::{Category, EventLocation, EventRecord};

/// Folder for screenshots whose category, timestamp or location could not be resolved.
pub const FALLBACK_FOLDER: &str = "various";

/// Where one screenshot goes: folder segments under the output root and the
/// file stem (the image keeps its own extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Sorted {
        segments: Vec<String>,
        file_stem: String,
    },
    Fallback {
        file_stem: String,
    },
}

impl Route {
    /// Destination folder relative to the output root.
    pub fn folder(&self, output_root: &Path) -> PathBuf {
        match self {
            Route::Sorted { segments, .. } => segments
                .iter()
                .fold(output_root.to_path_buf(), |path, segment| path.join(segment)),
            Route::Fallback { .. } => output_root.join(FALLBACK_FOLDER),
        }
    }

    pub fn file_stem(&self) -> &str {
        match self {
            Route::Sorted { file_stem, .. } | Route::Fallback { file_stem } => file_stem,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Route::Fallback { .. })
    }
}

/// Computes the destination of a classified screenshot.
///
/// `source_stem` is the base name of the text artifact / image and is only
/// used for fallback names. Pure: identical input gives an identical route.
pub fn route(record: &EventRecord, source_stem: &str, include_name: bool) -> Route {
    let fallback = || Route::Fallback {
        file_stem: format!("{} - {}", Category::Unknown.title(), source_stem),
    };

    let Some(timestamp) = record.timestamp else {
        return fallback();
    };

    let segments = match (record.category, &record.location) {
        (Category::Heal | Category::Vaccine, Some(EventLocation::Area(code))) => {
            vec![record.category.folder_name().to_string(), code.to_string()]
        }
        (Category::Reanimation, Some(EventLocation::Place(place))) => vec![
            record.category.folder_name().to_string(),
            place.zone.as_str().to_string(),
            timestamp.time_of_day().as_str().to_string(),
        ],
        _ => return fallback(),
    };

    let mut file_stem = format!("{} - {}", record.category.title(), timestamp.file_safe());
    if include_name {
        if let Some(name) = record.name.as_deref().map(sanitize_file_name) {
            if !name.is_empty() {
                file_stem.push_str(" - ");
                file_stem.push_str(&name);
            }
        }
    }

    Route::Sorted {
        segments,
        file_stem,
    }
}

/// Removes characters that are not allowed in Windows file names.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
