//! Legacy payloads: flat locations, numeric platforms, bare arrays

use serde::{Deserialize, Serialize};

use super::{BoardEntry, RawBoardEntry};
use crate::models::{Location, LocationKind};

#[derive(Debug, Serialize, Deserialize)]
struct RawLocation {
    #[serde(rename = "type")]
    kind: LocationKind,
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
    distance: Option<u32>,
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        Self {
            kind: raw.kind,
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            address: raw.address.unwrap_or_default(),
            latitude: raw.latitude.unwrap_or_default(),
            longitude: raw.longitude.unwrap_or_default(),
            distance: raw.distance,
        }
    }
}

impl From<&Location> for RawLocation {
    fn from(location: &Location) -> Self {
        Self {
            kind: location.kind,
            id: non_empty(&location.id),
            name: non_empty(&location.name),
            address: non_empty(&location.address),
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            distance: location.distance,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub(super) fn decode_locations(body: &str) -> Result<Vec<Location>, serde_json::Error> {
    let raw: Vec<RawLocation> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(Location::from).collect())
}

pub(super) fn encode_location(location: &Location) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RawLocation::from(location))
}

/// Departures and arrivals share one shape: a bare array
pub(super) fn decode_board(body: &str) -> Result<Vec<BoardEntry>, serde_json::Error> {
    let raw: Vec<RawBoardEntry<u32>> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(BoardEntry::from).collect())
}
