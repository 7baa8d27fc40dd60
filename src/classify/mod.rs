//! Classification of recognized overlay text.
//!
//! Turns the text of one screenshot into an [`EventRecord`]: which action the
//! player performed, on whom, when, and where.

pub mod action;
pub mod fuzzy;
pub mod location;
pub mod timestamp;

pub use action::{ActionMatcher, DetectedAction};
pub use location::{ReanimationLocations, ReanimationPlace, Zone, SIMPLE_LOCATIONS};
pub use timestamp::{TimeOfDay, Timestamp, TimestampExtractor};

use anyhow::Result;
use std::fmt;

use crate::config::MatchingConfig;

/// In-game event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Heal,
    Vaccine,
    Reanimation,
    Unknown,
}

impl Category {
    /// Top-level folder name in the sorted tree.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::Heal => "heal",
            Category::Vaccine => "vaccine",
            Category::Reanimation => "reanimation",
            Category::Unknown => "various",
        }
    }

    /// Capitalized form used in file names and reports.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Heal => "Heal",
            Category::Vaccine => "Vaccine",
            Category::Reanimation => "Reanimation",
            Category::Unknown => "Various",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Where the event happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLocation {
    /// One of the fixed heal/vaccine areas, as its folder code
    Area(&'static str),
    /// A reanimation place from the external table
    Place(ReanimationPlace),
}

/// Everything extracted from one screenshot's text. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub category: Category,
    pub name: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub location: Option<EventLocation>,
}

impl EventRecord {
    pub fn time_of_day(&self) -> Option<TimeOfDay> {
        self.timestamp.map(|ts| ts.time_of_day())
    }
}

/// Classifies recognized text using fixed phrase tables and the
/// reanimation location table.
pub struct Classifier {
    actions: ActionMatcher,
    timestamps: TimestampExtractor,
    reanimation_locations: ReanimationLocations,
    location_threshold: f64,
}

impl Classifier {
    pub fn new(matching: &MatchingConfig, reanimation_locations: ReanimationLocations) -> Result<Self> {
        Ok(Self {
            actions: ActionMatcher::new(matching.action_threshold)?,
            timestamps: TimestampExtractor::new()?,
            reanimation_locations,
            location_threshold: matching.location_threshold,
        })
    }

    /// Classifies the text of one screenshot. Pure: same text, same record.
    pub fn classify(&self, text: &str) -> EventRecord {
        let action = self.actions.detect(text);
        let timestamp = self.timestamps.extract(text);

        let (category, name) = match action {
            Some(DetectedAction { category, name }) => (category, Some(name)),
            None => (Category::Unknown, None),
        };

        let location = match category {
            Category::Heal | Category::Vaccine => {
                location::detect_simple_location(text, self.location_threshold)
                    .map(EventLocation::Area)
            }
            Category::Reanimation => self
                .reanimation_locations
                .detect(text, self.location_threshold)
                .cloned()
                .map(EventLocation::Place),
            Category::Unknown => None,
        };

        EventRecord {
            category,
            name,
            timestamp,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        let places = ReanimationLocations::new(vec![
            ReanimationPlace {
                name: "Пиллбокс-Хилл".to_string(),
                zone: Zone::City,
            },
            ReanimationPlace {
                name: "Грейпсид".to_string(),
                zone: Zone::NotCity,
            },
        ]);
        Classifier::new(&MatchingConfig::default(), places).unwrap()
    }

    #[test]
    fn test_heal_record() {
        let text = "Вы вылечили Иван Петров\nЭль-Бурро-Хайтс\n13:20 05.06.2024";
        let record = classifier().classify(text);

        assert_eq!(record.category, Category::Heal);
        assert_eq!(record.name.as_deref(), Some("Иван Петров"));
        assert_eq!(record.location, Some(EventLocation::Area("ELSH")));
        assert_eq!(record.time_of_day(), Some(TimeOfDay::Day));
    }

    #[test]
    fn test_reanimation_record_uses_external_table() {
        let text = "Вы реанимировали Max Payne\nГрейпсид\n23:10 05.06.2024";
        let record = classifier().classify(text);

        assert_eq!(record.category, Category::Reanimation);
        match &record.location {
            Some(EventLocation::Place(place)) => assert_eq!(place.zone, Zone::NotCity),
            other => panic!("unexpected location {:?}", other),
        }
        assert_eq!(record.time_of_day(), Some(TimeOfDay::Night));
    }

    #[test]
    fn test_reanimation_ignores_simple_areas() {
        // Fixed heal/vaccine areas are not part of the reanimation table
        let text = "Вы реанимировали Max Payne\nПалето-Бэй\n10:10 05.06.2024";
        let record = classifier().classify(text);
        assert_eq!(record.category, Category::Reanimation);
        assert_eq!(record.location, None);
    }

    #[test]
    fn test_unknown_record() {
        let record = classifier().classify("Палето-Бэй\n13:00 01.01.2024");
        assert_eq!(record.category, Category::Unknown);
        assert_eq!(record.name, None);
        assert_eq!(record.location, None);
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Heal.folder_name(), "heal");
        assert_eq!(Category::Reanimation.title(), "Reanimation");
        assert_eq!(Category::Unknown.folder_name(), "various");
    }
}
