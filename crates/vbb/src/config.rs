//! VBB client configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::wire::ApiVersion;

/// Configuration for the VBB transit client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VbbConfig {
    /// Base URL of the VBB REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Wire format generation spoken by `base_url`
    #[serde(default)]
    pub api_version: ApiVersion,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Allow fuzzy matching in location search
    #[serde(default = "default_fuzzy")]
    pub fuzzy: bool,
}

fn default_base_url() -> String {
    "https://v5.vbb.transport.rest".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("vbb-client/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_fuzzy() -> bool {
    true
}

impl Default for VbbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: ApiVersion::default(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            fuzzy: default_fuzzy(),
        }
    }
}

impl VbbConfig {
    /// Create a configuration pointing at `base_url` with the given wire format
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_version: ApiVersion) -> Self {
        Self {
            base_url: base_url.into(),
            api_version,
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables use the `VBB_` prefix (e.g. `VBB_BASE_URL`,
    /// `VBB_API_VERSION=legacy`) and override values from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("VBB").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(format!("base_url is not a valid URL: {e}"));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
