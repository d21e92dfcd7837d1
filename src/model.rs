//! Route and location records as exchanged with the dashboard API.
//!
//! Records are loosely typed on the wire (fields may be missing or `null`,
//! codes are numeric strings), so every optional field has a serde default
//! and the coercion rules live here rather than at each call site.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a location record.
pub type LocationId = i64;

/// Identifier of a route record.
pub type RouteId = i64;

/// Ids above this value are `Date.now()`-style timestamps handed out to
/// records that have not been saved yet.
pub const TEMP_ID_THRESHOLD: i64 = 1_000_000_000_000;

/// Returns true if `id` is a temporary id of an unsaved record.
pub fn is_temporary_id(id: i64) -> bool {
    id > TEMP_ID_THRESHOLD
}

/// A point in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named collection of delivery locations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub route: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shift: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warehouse: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub locations: Vec<Location>,
}

impl Route {
    pub fn new(id: RouteId, name: impl Into<String>) -> Self {
        Self {
            id,
            route: name.into(),
            ..Self::default()
        }
    }
}

/// Delivery power schedule of a location.
///
/// Unknown wire values are kept verbatim so that a read-modify-write cycle
/// does not rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PowerMode {
    #[default]
    Daily,
    Weekday,
    Alt1,
    Alt2,
    Unrecognized(String),
}

impl PowerMode {
    pub fn as_str(&self) -> &str {
        match self {
            PowerMode::Daily => "Daily",
            PowerMode::Weekday => "Weekday",
            PowerMode::Alt1 => "Alt 1",
            PowerMode::Alt2 => "Alt 2",
            PowerMode::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for PowerMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Daily" => PowerMode::Daily,
            "Weekday" => PowerMode::Weekday,
            "Alt 1" => PowerMode::Alt1,
            "Alt 2" => PowerMode::Alt2,
            _ => PowerMode::Unrecognized(value),
        }
    }
}

impl From<&str> for PowerMode {
    fn from(value: &str) -> Self {
        PowerMode::from(value.to_string())
    }
}

impl From<PowerMode> for String {
    fn from(mode: PowerMode) -> Self {
        match mode {
            PowerMode::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single delivery stop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub no: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    /// Display name of the stop.
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub power_mode: PowerMode,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub route_id: Option<RouteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_destination_url: Option<String>,
    /// User-assigned visiting rank. Never persisted by the API.
    #[serde(default, skip_serializing)]
    pub custom_rank: Option<i64>,
}

impl Location {
    pub fn new(id: LocationId, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn with_power_mode(mut self, mode: PowerMode) -> Self {
        self.power_mode = mode;
        self
    }

    pub fn with_custom_rank(mut self, rank: i64) -> Self {
        self.custom_rank = Some(rank);
        self
    }

    /// Coordinates, if both latitude and longitude are set.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    /// Numeric value of `code`, used as the default ordering key.
    pub fn numeric_code(&self) -> i64 {
        parse_int_prefix(&self.code)
    }
}

/// Decodes an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a leading integer the way form input is coerced: surrounding
/// whitespace is ignored, an optional sign is accepted, and parsing stops at
/// the first non-digit. Input without leading digits yields 0.
pub fn parse_int_prefix(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());

    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative { -value } else { value }
}
