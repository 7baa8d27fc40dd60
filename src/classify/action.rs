use anyhow::Result;
use regex::Regex;

use super::fuzzy::partial_ratio;
use super::Category;

/// Characters accepted in a player name, 3-40 of them.
const NAME_CLASS: &str = r"([A-Za-zА-Яа-яЁё0-9_ ]{3,40})";

/// Phrase fragments and the verb anchoring the name regex, per category.
/// Checked in this order; the first category whose phrase matches a line
/// owns that line.
const ACTION_RULES: [(Category, &[&str], &str); 3] = [
    (
        Category::Heal,
        &["вы вылечили", "you healed"],
        r"выл[её]чили|healed",
    ),
    (
        Category::Vaccine,
        &["вы вакцинировали", "you vaccinated"],
        r"вакцинировали|vaccinated",
    ),
    (
        Category::Reanimation,
        &["вы реанимировали", "you reanimated"],
        r"реанимировали|reanimated",
    ),
];

/// An action found in the overlay text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedAction {
    pub category: Category,
    /// Name of the treated player, one or two words
    pub name: String,
}

struct ActionRule {
    category: Category,
    phrases: &'static [&'static str],
    name_regex: Regex,
}

/// Finds the action line ("Вы вылечили Иван Петров") in recognized text.
pub struct ActionMatcher {
    threshold: f64,
    rules: Vec<ActionRule>,
}

impl ActionMatcher {
    /// Builds the matcher. `threshold` is the fuzzy score (0-100) a line
    /// must exceed to count as an action line.
    pub fn new(threshold: f64) -> Result<Self> {
        let mut rules = Vec::with_capacity(ACTION_RULES.len());
        for (category, phrases, verb) in ACTION_RULES {
            // Lazy separator so the greedy name group keeps both words
            let name_regex = Regex::new(&format!(r"(?i)(?:{})\D+?{}", verb, NAME_CLASS))?;
            rules.push(ActionRule {
                category,
                phrases,
                name_regex,
            });
        }
        Ok(Self { threshold, rules })
    }

    /// Scans lines in order and returns the first line that both matches
    /// an action phrase and yields a 1-2 word name.
    pub fn detect(&self, text: &str) -> Option<DetectedAction> {
        for line in text.lines() {
            let lower = line.to_lowercase();

            let Some(rule) = self.rules.iter().find(|rule| {
                rule.phrases
                    .iter()
                    .any(|phrase| partial_ratio(phrase, &lower) > self.threshold)
            }) else {
                continue;
            };

            if let Some(name) = extract_name(&rule.name_regex, line) {
                return Some(DetectedAction {
                    category: rule.category,
                    name,
                });
            }
        }
        None
    }
}

/// Applies the name regex to a line and validates the word count.
fn extract_name(regex: &Regex, line: &str) -> Option<String> {
    let captures = regex.captures(line)?;
    let name = captures.get(1)?.as_str().trim();
    let words = name.split_whitespace().count();
    if (1..=2).contains(&words) {
        Some(name.split_whitespace().collect::<Vec<_>>().join(" "))
    } else {
        None
    }
}
