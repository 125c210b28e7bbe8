//! Client for the VBB public transit API
//!
//! Searches stops, addresses and points of interest in the Berlin-Brandenburg
//! transport network, finds stops near a coordinate, and lists departures and
//! arrivals at a stop via the [VBB REST API](https://v5.vbb.transport.rest).
//!
//! # Architecture
//!
//! [`TransitClient`] defines the four queries and is implemented by
//! [`VbbClient`]. Each query is one HTTP GET whose JSON body is decoded into
//! [`Location`] or [`Departure`] values. The service has shipped two payload
//! generations; [`ApiVersion`] in [`VbbConfig`] picks which one is decoded.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! use chrono::Local;
//! use vbb::{LocationTypes, TransitClient, TransportModes, VbbClient, VbbConfig};
//!
//! let client = VbbClient::new(&VbbConfig::default())?;
//!
//! let stops = client
//!     .search_locations("Alexanderplatz", LocationTypes::STOPS, 3)
//!     .await?;
//!
//! let departures = client
//!     .departures(
//!         &stops[0].id,
//!         Local::now().fixed_offset(),
//!         Duration::from_secs(30 * 60),
//!         TransportModes::URBAN,
//!     )
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod filters;
mod models;
mod wire;

pub use client::{TransitClient, VbbClient};
pub use config::VbbConfig;
pub use error::{TransportError, VbbError};
pub use filters::{LocationTypes, TransportModes};
pub use models::{Departure, Line, Location, LocationKind, TransportMode};
pub use wire::ApiVersion;
