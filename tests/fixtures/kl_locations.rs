//! Delivery stops around Kuala Lumpur, with the Shah Alam kitchen as depot.

use chrono::NaiveDate;
use delivery_planner::model::{Location, PowerMode};

/// A named stop with coordinates.
#[derive(Debug, Clone)]
pub struct Stop {
    pub code: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Stop {
    pub const fn new(code: &'static str, name: &'static str, lat: f64, lng: f64) -> Self {
        Self { code, name, lat, lng }
    }

    pub fn to_location(&self, id: i64) -> Location {
        let mut location = Location::new(id, self.code).with_coordinates(self.lat, self.lng);
        location.location = self.name.to_string();
        location
    }
}

pub const DEPOT: Stop = Stop::new("QLK", "QL Kitchen", 3.0738, 101.5183);

pub const STOPS: &[Stop] = &[
    Stop::new("34", "Wisma Cimb", 3.1466, 101.6958),
    Stop::new("42", "Plaza Rakyat", 3.1440, 101.7010),
    Stop::new("51", "KLCC Tower", 3.1579, 101.7116),
    Stop::new("67", "Menara TM", 3.1160, 101.6660),
    Stop::new("89", "Pavilion KL", 3.1490, 101.7133),
    Stop::new("23", "Suria KLCC", 3.1586, 101.7122),
    Stop::new("76", "Mid Valley", 3.1180, 101.6770),
    Stop::new("94", "Bangsar Village", 3.1300, 101.6710),
    Stop::new("31", "Nu Sentral", 3.1336, 101.6853),
    Stop::new("58", "One Utama", 3.1502, 101.6152),
];

pub fn depot() -> Location {
    DEPOT.to_location(0)
}

/// All stops as locations with ids 1.., every one `Daily`.
pub fn locations() -> Vec<Location> {
    STOPS
        .iter()
        .enumerate()
        .map(|(i, stop)| stop.to_location(i as i64 + 1))
        .collect()
}

/// Builder shortcut for a stop without coordinates.
pub fn unplaced(id: i64, code: &str, mode: PowerMode) -> Location {
    Location::new(id, code).with_power_mode(mode)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2024-03-15, a Friday with an odd day of month.
pub fn friday() -> NaiveDate {
    date(2024, 3, 15)
}

/// 2024-05-08, a Wednesday with an even day of month.
pub fn even_wednesday() -> NaiveDate {
    date(2024, 5, 8)
}
