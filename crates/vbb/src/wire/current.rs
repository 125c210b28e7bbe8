//! Current payloads: nested stop coordinates, `poi` flag, enveloped boards

use serde::{Deserialize, Serialize};

use super::{BoardEntry, RawBoardEntry};
use crate::models::{Location, LocationKind};

/// Location tag as sent by the service
///
/// Addresses and points of interest both arrive as `location`; the `poi`
/// flag tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Stop,
    Station,
    Address,
    Poi,
    Location,
}

impl From<LocationKind> for RawKind {
    fn from(kind: LocationKind) -> Self {
        match kind {
            LocationKind::Stop => Self::Stop,
            LocationKind::Address => Self::Address,
            LocationKind::Poi => Self::Poi,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawCoordinates {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawLocation {
    #[serde(rename = "type")]
    kind: RawKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<RawCoordinates>,
    poi: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<u32>,
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        let kind = match (raw.kind, raw.poi.unwrap_or(false)) {
            (RawKind::Stop | RawKind::Station, _) => LocationKind::Stop,
            (RawKind::Poi, _) | (_, true) => LocationKind::Poi,
            (RawKind::Address | RawKind::Location, false) => LocationKind::Address,
        };

        let (mut latitude, mut longitude) = (raw.latitude, raw.longitude);
        if let Some(nested) = raw.location {
            latitude = nested.latitude.or(latitude);
            longitude = nested.longitude.or(longitude);
        }

        Self {
            kind,
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            address: raw.address.unwrap_or_default(),
            latitude: latitude.unwrap_or_default(),
            longitude: longitude.unwrap_or_default(),
            distance: raw.distance,
        }
    }
}

impl From<&Location> for RawLocation {
    fn from(location: &Location) -> Self {
        let nested = location.is_stop().then(|| RawCoordinates {
            kind: Some("location".to_string()),
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
        });

        Self {
            kind: location.kind.into(),
            id: non_empty(&location.id),
            name: non_empty(&location.name),
            address: non_empty(&location.address),
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            location: nested,
            poi: Some(location.is_poi()),
            distance: location.distance,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Deserialize)]
struct RawDepartures {
    departures: Vec<RawBoardEntry<String>>,
}

#[derive(Debug, Deserialize)]
struct RawArrivals {
    arrivals: Vec<RawBoardEntry<String>>,
}

pub(super) fn decode_locations(body: &str) -> Result<Vec<Location>, serde_json::Error> {
    let raw: Vec<RawLocation> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(Location::from).collect())
}

pub(super) fn encode_location(location: &Location) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RawLocation::from(location))
}

pub(super) fn decode_departures(body: &str) -> Result<Vec<BoardEntry>, serde_json::Error> {
    let raw: RawDepartures = serde_json::from_str(body)?;
    Ok(raw.departures.into_iter().map(BoardEntry::from).collect())
}

pub(super) fn decode_arrivals(body: &str) -> Result<Vec<BoardEntry>, serde_json::Error> {
    let raw: RawArrivals = serde_json::from_str(body)?;
    Ok(raw.arrivals.into_iter().map(BoardEntry::from).collect())
}
