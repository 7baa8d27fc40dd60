//! Points awarded per screenshot in each bucket of the sorted tree.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::classify::{TimeOfDay, Zone};

/// Points per reanimation screenshot by zone and time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReanimationPoints {
    pub city_day: u32,
    pub not_city_day: u32,
    pub city_night: u32,
    pub not_city_night: u32,
}

impl Default for ReanimationPoints {
    fn default() -> Self {
        Self {
            city_day: 3,
            not_city_day: 4,
            city_night: 5,
            not_city_night: 6,
        }
    }
}

/// Score table, keyed by the folder names of the sorted tree.
///
/// Heal and vaccine points are looked up by area code (`ELSH`,
/// `Sandy-Shores`, `Paleto-Bay`). Areas listed in config.json override the
/// default points; unlisted areas keep them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    #[serde(deserialize_with = "merge_heal")]
    pub heal: BTreeMap<String, u32>,
    #[serde(deserialize_with = "merge_vaccine")]
    pub vaccine: BTreeMap<String, u32>,
    pub reanimation: ReanimationPoints,
}

fn area_points(elsh: u32, sandy: u32, paleto: u32) -> BTreeMap<String, u32> {
    BTreeMap::from([
        ("ELSH".to_string(), elsh),
        ("Sandy-Shores".to_string(), sandy),
        ("Paleto-Bay".to_string(), paleto),
    ])
}

fn default_heal() -> BTreeMap<String, u32> {
    area_points(1, 2, 2)
}

fn default_vaccine() -> BTreeMap<String, u32> {
    area_points(3, 5, 5)
}

fn merge_heal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, u32>, D::Error> {
    merge_areas(default_heal(), deserializer)
}

fn merge_vaccine<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, u32>, D::Error> {
    merge_areas(default_vaccine(), deserializer)
}

/// Applies the configured area points on top of `defaults`.
fn merge_areas<'de, D: Deserializer<'de>>(
    mut defaults: BTreeMap<String, u32>,
    deserializer: D,
) -> Result<BTreeMap<String, u32>, D::Error> {
    let overrides = BTreeMap::<String, u32>::deserialize(deserializer)?;
    defaults.extend(overrides);
    Ok(defaults)
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            heal: default_heal(),
            vaccine: default_vaccine(),
            reanimation: ReanimationPoints::default(),
        }
    }
}

impl ScoreTable {
    pub fn heal_points(&self, area: &str) -> Option<u32> {
        self.heal.get(area).copied()
    }

    pub fn vaccine_points(&self, area: &str) -> Option<u32> {
        self.vaccine.get(area).copied()
    }

    pub fn reanimation_points(&self, zone: Zone, time: TimeOfDay) -> u32 {
        let points = &self.reanimation;
        match (zone, time) {
            (Zone::City, TimeOfDay::Day) => points.city_day,
            (Zone::NotCity, TimeOfDay::Day) => points.not_city_day,
            (Zone::City, TimeOfDay::Night) => points.city_night,
            (Zone::NotCity, TimeOfDay::Night) => points.not_city_night,
        }
    }
}
