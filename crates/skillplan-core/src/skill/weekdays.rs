//! Weekday sets for "off" days.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Full weekday names, indexed Sunday=0.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Day of week index for a date (0-6, Sunday=0).
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Parse a single weekday given as an index or an English name.
pub fn parse_weekday(s: &str) -> Option<u8> {
    let lower = s.trim().to_lowercase();
    match lower.as_str() {
        "0" | "sun" | "sunday" => Some(0),
        "1" | "mon" | "monday" => Some(1),
        "2" | "tue" | "tuesday" => Some(2),
        "3" | "wed" | "wednesday" => Some(3),
        "4" | "thu" | "thursday" => Some(4),
        "5" | "fri" | "friday" => Some(5),
        "6" | "sat" | "saturday" => Some(6),
        _ => None,
    }
}

/// Set of weekday indices (0=Sunday..6=Saturday) on which no work is scheduled.
///
/// Stored as a 7-bit mask. Serialized as a sorted list of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    const ALL: u8 = 0b0111_1111;

    pub fn new() -> Self {
        Self(0)
    }

    /// Build from indices.
    ///
    /// # Errors
    /// Returns an error if any index is greater than 6.
    pub fn from_indices(days: &[u8]) -> Result<Self, ValidationError> {
        let mut set = Self::new();
        for &day in days {
            set.insert(day)?;
        }
        Ok(set)
    }

    /// Add a weekday.
    ///
    /// # Errors
    /// Returns an error if `day` is greater than 6.
    pub fn insert(&mut self, day: u8) -> Result<(), ValidationError> {
        if day > 6 {
            return Err(ValidationError::InvalidValue {
                field: "excluded_weekdays".into(),
                message: format!("weekday index {day} is not in 0-6"),
            });
        }
        self.0 |= 1 << day;
        Ok(())
    }

    pub fn remove(&mut self, day: u8) {
        if day <= 6 {
            self.0 &= !(1 << day);
        }
    }

    pub fn contains(&self, day: u8) -> bool {
        day <= 6 && self.0 & (1 << day) != 0
    }

    /// Whether the date falls on an excluded weekday.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(weekday_index(date))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Every day of the week is excluded.
    pub fn is_full(&self) -> bool {
        self.0 & Self::ALL == Self::ALL
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..7u8).filter(move |d| self.contains(*d))
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = ValidationError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(&days)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

impl FromStr for WeekdaySet {
    type Err = ValidationError;

    /// Parses comma-separated indices or names, e.g. `"sat,sun"` or `"0,6"`.
    /// An empty string or `"none"` is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::new());
        }

        let mut set = Self::new();
        for part in trimmed.split(',').filter(|p| !p.trim().is_empty()) {
            let day = parse_weekday(part).ok_or_else(|| ValidationError::InvalidValue {
                field: "excluded_weekdays".into(),
                message: format!("unknown weekday '{}'", part.trim()),
            })?;
            set.insert(day)?;
        }
        Ok(set)
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.iter().map(|d| SHORT_NAMES[d as usize]).collect();
        write!(f, "{}", names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_indices() {
        let set: WeekdaySet = "sat, Sun".parse().unwrap();
        assert!(set.contains(0));
        assert!(set.contains(6));
        assert_eq!(set.len(), 2);

        let same: WeekdaySet = "0,6".parse().unwrap();
        assert_eq!(set, same);
    }

    #[test]
    fn empty_and_none_parse_to_empty_set() {
        assert!("".parse::<WeekdaySet>().unwrap().is_empty());
        assert!("none".parse::<WeekdaySet>().unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_day() {
        assert!("funday".parse::<WeekdaySet>().is_err());
        assert!(WeekdaySet::from_indices(&[7]).is_err());
    }

    #[test]
    fn contains_date_uses_sunday_zero() {
        let set = WeekdaySet::from_indices(&[0]).unwrap();
        // 2026-10-18 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(set.contains_date(sunday));
        assert!(!set.contains_date(sunday.succ_opt().unwrap()));
    }

    #[test]
    fn serializes_as_sorted_indices() {
        let set: WeekdaySet = "sat,mon".parse().unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,6]");

        let parsed: WeekdaySet = serde_json::from_str("[6,1]").unwrap();
        assert_eq!(parsed, set);
        assert!(serde_json::from_str::<WeekdaySet>("[9]").is_err());
    }

    #[test]
    fn full_week() {
        let set = WeekdaySet::from_indices(&[0, 1, 2, 3, 4, 5, 6]).unwrap();
        assert!(set.is_full());
        assert_eq!(set.to_string(), "Sun,Mon,Tue,Wed,Thu,Fri,Sat");
    }

    #[test]
    fn remove_day() {
        let mut set: WeekdaySet = "sat,sun".parse().unwrap();
        set.remove(6);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0]);
    }
}
