//! Delivery power schedule classification.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::PowerMode;

const ON_COLOR: &str = "#10b981";
const OFF_COLOR: &str = "#ef4444";

/// Whether a location takes deliveries on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerStatus {
    On,
    Off,
}

impl PowerStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PowerStatus::On => "ON",
            PowerStatus::Off => "OFF",
        }
    }

    /// Display color used by the dashboard for this status.
    pub const fn color(self) -> &'static str {
        match self {
            PowerStatus::On => ON_COLOR,
            PowerStatus::Off => OFF_COLOR,
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, PowerStatus::On)
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of `mode` on `date`.
///
/// `Weekday` locations are off on Friday and Saturday, `Alt 1` is on for odd
/// days of the month and `Alt 2` for even ones. Unknown modes are off.
pub fn power_status(mode: &PowerMode, date: NaiveDate) -> PowerStatus {
    let on = match mode {
        PowerMode::Daily => true,
        PowerMode::Weekday => !matches!(date.weekday(), Weekday::Fri | Weekday::Sat),
        PowerMode::Alt1 => date.day() % 2 == 1,
        PowerMode::Alt2 => date.day() % 2 == 0,
        PowerMode::Unrecognized(_) => false,
    };

    if on { PowerStatus::On } else { PowerStatus::Off }
}

/// The local calendar date, for callers that classify against "today".
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_is_always_on() {
        let start = date(2024, 1, 1);
        for offset in 0..31 {
            let day = start + chrono::Days::new(offset);
            assert_eq!(power_status(&PowerMode::Daily, day), PowerStatus::On);
        }
    }

    #[test]
    fn test_weekday_off_on_friday_and_saturday() {
        // 2024-03-15 is a Friday
        assert_eq!(power_status(&PowerMode::Weekday, date(2024, 3, 15)), PowerStatus::Off);
        assert_eq!(power_status(&PowerMode::Weekday, date(2024, 3, 16)), PowerStatus::Off);
        assert_eq!(power_status(&PowerMode::Weekday, date(2024, 3, 17)), PowerStatus::On);
        assert_eq!(power_status(&PowerMode::Weekday, date(2024, 3, 14)), PowerStatus::On);
    }

    #[test]
    fn test_alternating_modes_follow_day_of_month() {
        let seventh = date(2024, 5, 7);
        assert_eq!(power_status(&PowerMode::Alt1, seventh), PowerStatus::On);
        assert_eq!(power_status(&PowerMode::Alt2, seventh), PowerStatus::Off);

        let eighth = date(2024, 5, 8);
        assert_eq!(power_status(&PowerMode::Alt1, eighth), PowerStatus::Off);
        assert_eq!(power_status(&PowerMode::Alt2, eighth), PowerStatus::On);
    }

    #[test]
    fn test_unrecognized_mode_is_off() {
        let mode = PowerMode::Unrecognized("Sometimes".to_string());
        assert_eq!(power_status(&mode, date(2024, 5, 7)), PowerStatus::Off);
    }

    #[test]
    fn test_status_presentation() {
        assert_eq!(PowerStatus::On.as_str(), "ON");
        assert_eq!(PowerStatus::Off.to_string(), "OFF");
        assert_eq!(PowerStatus::On.color(), "#10b981");
        assert_eq!(PowerStatus::Off.color(), "#ef4444");
        assert!(PowerStatus::On < PowerStatus::Off);
    }
}
