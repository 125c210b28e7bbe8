//! Transit data models
//!
//! Typed representations of locations and departure board entries. These are
//! the same regardless of which wire format generation the client speaks; see
//! [`crate::ApiVersion`] for the payload differences.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::filters::TransportModes;

/// What a [`Location`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// A transit stop or station
    Stop,
    /// A street address
    Address,
    /// A point of interest
    Poi,
}

impl LocationKind {
    /// Name of the kind as used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Address => "address",
            Self::Poi => "poi",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stop, address or point of interest
///
/// Coordinates are `0.0` when the service does not report them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Kind of location
    pub kind: LocationKind,
    /// Opaque identifier, empty for addresses
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text address, set for address results
    pub address: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Walking distance in meters (nearby search only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
}

impl Location {
    /// Create a location of the given kind without coordinates
    #[must_use]
    pub fn new(kind: LocationKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            address: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            distance: None,
        }
    }

    /// Set the coordinates
    #[must_use]
    pub const fn with_coords(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Set the free-text address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Whether this location is a transit stop
    #[must_use]
    pub fn is_stop(&self) -> bool {
        self.kind == LocationKind::Stop
    }

    /// Whether this location is a point of interest
    #[must_use]
    pub fn is_poi(&self) -> bool {
        self.kind == LocationKind::Poi
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.address)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A public transport line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Line {
    /// Display name (e.g., "S5", "U2", "M10")
    pub name: String,
    /// Product family (e.g., "suburban", "bus")
    pub product: String,
}

impl Line {
    /// Transport mode of this line, if the product is known
    #[must_use]
    pub fn mode(&self) -> Option<TransportMode> {
        TransportMode::from_product(&self.product)
    }
}

/// A single departure or arrival at a stop
///
/// Arrivals use the same shape; their `direction` holds where the vehicle
/// came from when the service leaves the direction blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Departure {
    /// Destination (departures) or origin (arrivals)
    pub direction: String,
    /// Real-time departure time, absent if unknown or cancelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<DateTime<FixedOffset>>,
    /// Scheduled departure time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_when: Option<DateTime<FixedOffset>>,
    /// Delay in seconds (None = unknown, 0 = on time)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    /// Real-time platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Scheduled platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_platform: Option<String>,
    /// Line serving this departure
    pub line: Line,
}

impl Departure {
    /// Delay rounded toward zero to whole minutes
    #[must_use]
    pub fn delay_minutes(&self) -> Option<i64> {
        self.delay.map(|secs| secs / 60)
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.when.or(self.planned_when) {
            Some(time) => write!(f, "{}", time.format("%H:%M"))?,
            None => f.write_str("--:--")?,
        }
        write!(f, " {} → {}", self.line.name, self.direction)?;

        match self.delay_minutes() {
            Some(mins) if mins > 0 => write!(f, " (+{mins} min)"),
            Some(mins) if mins < 0 => write!(f, " ({mins} min)"),
            _ => Ok(()),
        }
    }
}

/// Single transport mode, as reported in a line's product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// S-Bahn
    Suburban,
    /// U-Bahn
    Subway,
    /// Tram
    Tram,
    /// Bus
    Bus,
    /// Ferry
    Ferry,
    /// ICE / IC / EC
    Express,
    /// RE / RB
    Regional,
}

impl TransportMode {
    /// Map a product string to a transport mode
    #[must_use]
    pub fn from_product(product: &str) -> Option<Self> {
        match product {
            "suburban" => Some(Self::Suburban),
            "subway" => Some(Self::Subway),
            "tram" => Some(Self::Tram),
            "bus" => Some(Self::Bus),
            "ferry" => Some(Self::Ferry),
            "express" | "nationalExpress" | "national" => Some(Self::Express),
            "regional" | "regionalExpress" => Some(Self::Regional),
            _ => None,
        }
    }

    /// The filter bit selecting this mode
    #[must_use]
    pub const fn flag(&self) -> TransportModes {
        match self {
            Self::Suburban => TransportModes::SUBURBAN,
            Self::Subway => TransportModes::SUBWAY,
            Self::Tram => TransportModes::TRAM,
            Self::Bus => TransportModes::BUS,
            Self::Ferry => TransportModes::FERRY,
            Self::Express => TransportModes::EXPRESS,
            Self::Regional => TransportModes::REGIONAL,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Suburban => "S-Bahn",
            Self::Subway => "U-Bahn",
            Self::Tram => "Tram",
            Self::Bus => "Bus",
            Self::Ferry => "Ferry",
            Self::Express => "ICE/IC",
            Self::Regional => "Regional",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
