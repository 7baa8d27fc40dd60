use anyhow::Result;
use regex::Regex;
use std::fmt;

/// In-game clock and date as printed in the overlay: `14:05 12.03.2024`.
/// Separators are tolerated in several forms because OCR often swaps or drops them.
const TIMESTAMP_PATTERN: &str = r"(\d{1,2})[.:](\d{2})\s+(\d{2})[.\-/]?(\d{2})[.\-/]?(\d{4})";

/// First hour (inclusive) and last hour (exclusive) of the Day bucket.
const DAY_START_HOUR: u32 = 12;
const DAY_END_HOUR: u32 = 22;

/// Time-of-day bucket used by reanimation routing and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Buckets an hour: 12..22 is Day, everything else Night.
    pub fn from_hour(hour: u32) -> Self {
        if (DAY_START_HOUR..DAY_END_HOUR).contains(&hour) {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }

    /// Folder name for this bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "Day",
            TimeOfDay::Night => "Night",
        }
    }

    pub const ALL: [TimeOfDay; 2] = [TimeOfDay::Day, TimeOfDay::Night];
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamp read from the overlay. Values are kept as printed;
/// OCR noise such as hour 25 is not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub hour: u32,
    pub minute: u32,
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl Timestamp {
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour)
    }

    /// File-name friendly form: `14-05 12-03-2024`.
    pub fn file_safe(&self) -> String {
        self.to_string().replace([':', '.'], "-")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {:02}.{:02}.{:04}",
            self.hour, self.minute, self.day, self.month, self.year
        )
    }
}

/// Extracts the first timestamp in the text.
pub struct TimestampExtractor {
    regex: Regex,
}

impl TimestampExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            regex: Regex::new(TIMESTAMP_PATTERN)?,
        })
    }

    pub fn extract(&self, text: &str) -> Option<Timestamp> {
        let captures = self.regex.captures(text)?;
        let field = |i: usize| -> Option<u32> { captures.get(i)?.as_str().parse().ok() };

        Some(Timestamp {
            hour: field(1)?,
            minute: field(2)?,
            day: field(3)?,
            month: field(4)?,
            year: field(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<Timestamp> {
        TimestampExtractor::new().unwrap().extract(text)
    }

    #[test]
    fn test_standard_format() {
        let ts = extract("Вы вылечили Иван\n14:05 12.03.2024").unwrap();
        assert_eq!(ts.hour, 14);
        assert_eq!(ts.minute, 5);
        assert_eq!(ts.day, 12);
        assert_eq!(ts.month, 3);
        assert_eq!(ts.year, 2024);
        assert_eq!(ts.to_string(), "14:05 12.03.2024");
    }

    #[test]
    fn test_single_digit_hour_is_padded() {
        let ts = extract("9.30 01-02-2025").unwrap();
        assert_eq!(ts.to_string(), "09:30 01.02.2025");
    }

    #[test]
    fn test_missing_date_separators() {
        let ts = extract("23:59 31122023").unwrap();
        assert_eq!(ts.to_string(), "23:59 31.12.2023");
    }

    #[test]
    fn test_first_match_wins() {
        let ts = extract("10:00 01.01.2024 and 20:00 02.02.2024").unwrap();
        assert_eq!(ts.hour, 10);
    }

    #[test]
    fn test_no_timestamp() {
        assert!(extract("Вы вылечили Иван Петров").is_none());
        assert!(extract("12:00").is_none());
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(13), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(22), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Night);
    }

    #[test]
    fn test_file_safe() {
        let ts = extract("13:05 01.02.2024").unwrap();
        assert_eq!(ts.file_safe(), "13-05 01-02-2024");
    }
}
