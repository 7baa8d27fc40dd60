//! Place-name matching.
//!
//! Heal and vaccine events are sorted by one of three fixed areas.
//! Reanimation events only care whether the place counts as city, which is
//! looked up in an external JSON table:
//!
//! ```json
//! { "locations": [ { "name": "Пиллбокс-Хилл", "City": 1 } ] }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use super::fuzzy::partial_ratio;

/// Place names shown in the overlay and the folder code each maps to.
/// Matched in this order.
pub const SIMPLE_LOCATIONS: [(&str, &str); 3] = [
    ("Эль-Бурро-Хайтс", "ELSH"),
    ("Сэнди-Шорс", "Sandy-Shores"),
    ("Палето-Бэй", "Paleto-Bay"),
];

/// City/NotCity classification of a reanimation place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    City,
    NotCity,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::City => "City",
            Zone::NotCity => "NotCity",
        }
    }

    pub const ALL: [Zone; 2] = [Zone::City, Zone::NotCity];
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reanimation place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReanimationPlace {
    pub name: String,
    pub zone: Zone,
}

#[derive(Deserialize)]
struct LocationFile {
    locations: Vec<LocationEntry>,
}

#[derive(Deserialize)]
struct LocationEntry {
    name: String,
    #[serde(rename = "City", default)]
    city: i64,
}

/// Returns the fixed folder code of the first known area found in the text.
pub fn detect_simple_location(text: &str, threshold: f64) -> Option<&'static str> {
    for line in text.lines() {
        let lower = line.to_lowercase();
        for (name, code) in SIMPLE_LOCATIONS {
            if partial_ratio(&name.to_lowercase(), &lower) > threshold {
                return Some(code);
            }
        }
    }
    None
}

/// Reanimation place table, in file order.
#[derive(Debug, Clone, Default)]
pub struct ReanimationLocations {
    places: Vec<ReanimationPlace>,
}

impl ReanimationLocations {
    pub fn new(places: Vec<ReanimationPlace>) -> Self {
        Self { places }
    }

    /// Parses the JSON table. `City == 1` means city, any other value not.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: LocationFile =
            serde_json::from_str(contents).context("Invalid location table JSON")?;

        let places = file
            .locations
            .into_iter()
            .map(|entry| ReanimationPlace {
                name: entry.name,
                zone: if entry.city == 1 {
                    Zone::City
                } else {
                    Zone::NotCity
                },
            })
            .collect();

        Ok(Self { places })
    }

    /// Loads the JSON table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read location table: {}", path.display()))?;
        let locations = Self::from_json(&contents)?;
        if locations.is_empty() {
            crate::log(&format!(
                "Warning: no reanimation locations in {}",
                path.display()
            ));
        }
        crate::log(&format!(
            "Loaded {} reanimation locations from {}",
            locations.len(),
            path.display()
        ));
        Ok(locations)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Returns the first place (by line, then table order) found in the text.
    pub fn detect(&self, text: &str, threshold: f64) -> Option<&ReanimationPlace> {
        for line in text.lines() {
            let lower = line.to_lowercase();
            for place in &self.places {
                if partial_ratio(&place.name.to_lowercase(), &lower) > threshold {
                    return Some(place);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TABLE: &str = r#"{
        "locations": [
            { "name": "Пиллбокс-Хилл", "City": 1 },
            { "name": "Грейпсид", "City": 0 },
            { "name": "Сэнди-Шорс", "City": 0 }
        ]
    }"#;

    #[test]
    fn test_simple_location_exact() {
        let text = "Вы вылечили Иван\nПалето-Бэй\n14:00 01.01.2024";
        assert_eq!(detect_simple_location(text, 85.0), Some("Paleto-Bay"));
    }

    #[test]
    fn test_simple_location_case_and_noise() {
        let text = "район: СЭНДИ-ШОРС, округ Блэйн";
        assert_eq!(detect_simple_location(text, 85.0), Some("Sandy-Shores"));
    }

    #[test]
    fn test_simple_location_ocr_typo() {
        // 'э' read as 'е'
        assert_eq!(detect_simple_location("Палето-Бей", 85.0), Some("Paleto-Bay"));
    }

    #[test]
    fn test_simple_location_missing() {
        assert_eq!(detect_simple_location("Вы вылечили Иван", 85.0), None);
    }

    #[test]
    fn test_simple_location_line_order() {
        let text = "Сэнди-Шорс\nЭль-Бурро-Хайтс";
        assert_eq!(detect_simple_location(text, 85.0), Some("Sandy-Shores"));
    }

    #[test]
    fn test_reanimation_table_parse() {
        let table = ReanimationLocations::from_json(TABLE).unwrap();
        assert_eq!(table.len(), 3);
        let place = table.detect("Пиллбокс-Хилл", 85.0).unwrap();
        assert_eq!(place.zone, Zone::City);
    }

    #[test]
    fn test_reanimation_not_city() {
        let table = ReanimationLocations::from_json(TABLE).unwrap();
        let place = table.detect("вы реанимировали Max\nГрейпсид", 85.0).unwrap();
        assert_eq!(place.name, "Грейпсид");
        assert_eq!(place.zone, Zone::NotCity);
    }

    #[test]
    fn test_reanimation_missing_city_field_is_not_city() {
        let table =
            ReanimationLocations::from_json(r#"{"locations":[{"name":"Чилиад"}]}"#).unwrap();
        assert_eq!(table.detect("гора Чилиад", 85.0).unwrap().zone, Zone::NotCity);
    }

    #[test]
    fn test_reanimation_table_invalid() {
        assert!(ReanimationLocations::from_json(r#"{"places": []}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gta-locations.json");
        std::fs::write(&path, TABLE).unwrap();

        let table = ReanimationLocations::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert!(ReanimationLocations::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_bundled_table() {
        let table =
            ReanimationLocations::from_json(include_str!("../../resources/gta-locations.json"))
                .unwrap();
        assert!(!table.is_empty());

        let place = table.detect("Пиллбокс-Хилл", 85.0).unwrap();
        assert_eq!(place.zone, Zone::City);
        let place = table.detect("Грейпсид", 85.0).unwrap();
        assert_eq!(place.zone, Zone::NotCity);
    }
}
