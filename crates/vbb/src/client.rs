//! VBB transit client
//!
//! Provides location search, nearby-stop lookup and departure/arrival boards
//! using the public [VBB REST API](https://v5.vbb.transport.rest).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::config::VbbConfig;
use crate::error::{TransportError, VbbError};
use crate::filters::{LocationTypes, TransportModes};
use crate::models::{Departure, Location};
use crate::wire::ApiVersion;

/// Wire format of the `when` parameter
const WHEN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Trait for transit service clients
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Search for stops, addresses and points of interest by name
    async fn search_locations(
        &self,
        query: &str,
        types: LocationTypes,
        results: u32,
    ) -> Result<Vec<Location>, VbbError>;

    /// Find stops within walking distance of a coordinate
    async fn stops_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        distance: u32,
        results: u32,
    ) -> Result<Vec<Location>, VbbError>;

    /// List departures at a stop starting at `when`
    async fn departures(
        &self,
        stop_id: &str,
        when: DateTime<FixedOffset>,
        duration: Duration,
        modes: TransportModes,
    ) -> Result<Vec<Departure>, VbbError>;

    /// List arrivals at a stop starting at `when`
    async fn arrivals(
        &self,
        stop_id: &str,
        when: DateTime<FixedOffset>,
        duration: Duration,
        modes: TransportModes,
    ) -> Result<Vec<Departure>, VbbError>;

    /// Check if the transit service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Client for the VBB REST API
///
/// Holds only immutable configuration and a [`reqwest::Client`], so it can be
/// shared between tasks. Every call is a single request; nothing is cached or
/// retried.
#[derive(Debug, Clone)]
pub struct VbbClient {
    client: Client,
    base_url: Url,
    config: VbbConfig,
}

impl VbbClient {
    /// Create a new VBB client with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &VbbConfig) -> Result<Self, VbbError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| VbbError::Configuration(format!("HTTP client: {e}")))?;

        Self::with_http_client(config, client)
    }

    /// Create a new VBB client on top of an existing HTTP client
    ///
    /// Timeouts and other transport settings are whatever `client` was built with.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_http_client(config: &VbbConfig, client: Client) -> Result<Self, VbbError> {
        config.validate().map_err(VbbError::Configuration)?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| VbbError::Configuration(format!("base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(VbbError::Configuration(format!(
                "base_url cannot be used as a base: {base_url}"
            )));
        }

        Ok(Self {
            client,
            base_url,
            config: config.clone(),
        })
    }

    /// Wire format generation this client speaks
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.config.api_version
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET request and decode the body with this client's wire format
    async fn fetch<T>(
        &self,
        operation: &'static str,
        segments: &[&str],
        params: &[(&str, String)],
        decode: fn(ApiVersion, &str) -> Result<T, serde_json::Error>,
    ) -> Result<T, VbbError> {
        let path = format!("/{}", segments.join("/"));
        let request_error = |source: TransportError| VbbError::Request {
            operation,
            path: path.clone(),
            source,
        };

        let url = self
            .endpoint(segments)
            .map_err(|e| request_error(e.into()))?;

        debug!(%url, operation, "Sending request");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| request_error(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(request_error(TransportError::Status(status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| request_error(e.into()))?;

        decode(self.config.api_version, &body).map_err(|source| VbbError::Decode {
            operation,
            path,
            source,
        })
    }

    /// Fetch a departures or arrivals board
    async fn board(
        &self,
        operation: &'static str,
        stop_id: &str,
        when: DateTime<FixedOffset>,
        duration: Duration,
        modes: TransportModes,
        decode: fn(ApiVersion, &str) -> Result<Vec<Departure>, serde_json::Error>,
    ) -> Result<Vec<Departure>, VbbError> {
        let params = board_params(when, duration, modes);

        let entries = self
            .fetch(operation, &["stops", stop_id, operation], &params, decode)
            .await?;

        if entries.is_empty() {
            debug!(stop_id, operation, "Board is empty");
        }

        debug!(count = entries.len(), operation, "Board entries found");
        Ok(entries)
    }
}

#[async_trait]
impl TransitClient for VbbClient {
    #[instrument(skip(self))]
    async fn search_locations(
        &self,
        query: &str,
        types: LocationTypes,
        results: u32,
    ) -> Result<Vec<Location>, VbbError> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("results", results.to_string()),
        ];
        params.extend(types.query_params().map(|(k, v)| (k, v.to_string())));
        if !self.config.fuzzy {
            params.push(("fuzzy", "false".to_string()));
        }
        params.push(("pretty", "false".to_string()));

        let locations = self
            .fetch(
                "search_locations",
                &["locations"],
                &params,
                ApiVersion::decode_locations,
            )
            .await?;

        debug!(count = locations.len(), "Locations found");
        Ok(locations)
    }

    #[instrument(skip(self))]
    async fn stops_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        distance: u32,
        results: u32,
    ) -> Result<Vec<Location>, VbbError> {
        let version = self.config.api_version;

        let mut params: Vec<(&str, String)> = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
        ];
        if version.supports_nearby_distance() {
            params.push(("distance", distance.to_string()));
        }
        params.push(("results", results.to_string()));
        params.push(("pretty", "false".to_string()));

        let stops = self
            .fetch(
                "stops_nearby",
                version.nearby_path(),
                &params,
                ApiVersion::decode_locations,
            )
            .await?;

        debug!(count = stops.len(), "Nearby stops found");
        Ok(stops)
    }

    #[instrument(skip(self))]
    async fn departures(
        &self,
        stop_id: &str,
        when: DateTime<FixedOffset>,
        duration: Duration,
        modes: TransportModes,
    ) -> Result<Vec<Departure>, VbbError> {
        self.board(
            "departures",
            stop_id,
            when,
            duration,
            modes,
            ApiVersion::decode_departures,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn arrivals(
        &self,
        stop_id: &str,
        when: DateTime<FixedOffset>,
        duration: Duration,
        modes: TransportModes,
    ) -> Result<Vec<Departure>, VbbError> {
        self.board(
            "arrivals",
            stop_id,
            when,
            duration,
            modes,
            ApiVersion::decode_arrivals,
        )
        .await
    }

    async fn is_healthy(&self) -> bool {
        let Ok(url) = self.endpoint(&["locations"]) else {
            return false;
        };

        self.client
            .get(url)
            .query(&[("query", "test"), ("results", "1"), ("pretty", "false")])
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}

/// Query parameters shared by departure and arrival boards
fn board_params(
    when: DateTime<FixedOffset>,
    duration: Duration,
    modes: TransportModes,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("when", format_when(&when)),
        ("duration", (duration.as_secs() / 60).to_string()),
    ];
    params.extend(modes.query_params().map(|(k, v)| (k, v.to_string())));
    params.push(("pretty", "false".to_string()));
    params
}

/// Format a reference time with a numeric UTC offset (`+0200`, never `Z`)
fn format_when(when: &DateTime<FixedOffset>) -> String {
    when.format(WHEN_FORMAT).to_string()
}
