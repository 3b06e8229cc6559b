//! Connector configuration.

use std::time::Duration;

use thiserror::Error;

/// Default M2X API endpoint.
pub const DEFAULT_API_URL: &str = "http://api-m2x.att.com/v2/";

/// Validated configuration for one device/stream endpoint.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// API key sent as the `X-API-KEY` header. Treat as a secret.
    pub api_key: String,
    /// Base API URL; trailing slashes are tolerated.
    pub api_url: String,
    pub device_id: String,
    pub stream_name: String,
    /// How far in the past to bound the first fetch when no cursor is
    /// stored. Zero means no lower bound.
    pub start_time_ago: Duration,
}

/// Configuration validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required property: {0}")]
    Missing(&'static str),

    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ConnectorConfig {
    /// Create a new builder.
    pub fn builder() -> ConnectorConfigBuilder {
        ConnectorConfigBuilder::default()
    }
}

/// Builder for [`ConnectorConfig`].
#[derive(Debug, Default)]
pub struct ConnectorConfigBuilder {
    api_key: Option<String>,
    api_url: Option<String>,
    device_id: Option<String>,
    stream_name: Option<String>,
    start_time_ago: Option<Duration>,
}

impl ConnectorConfigBuilder {
    /// Set the API key (required).
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base API URL (default: [`DEFAULT_API_URL`]).
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Set the device id (required).
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Set the stream name (required).
    pub fn stream_name(mut self, stream_name: impl Into<String>) -> Self {
        self.stream_name = Some(stream_name.into());
        self
    }

    /// Set the first-run lookback (default: zero, no lower bound).
    pub fn start_time_ago(mut self, ago: Duration) -> Self {
        self.start_time_ago = Some(ago);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ConnectorConfig, ConfigError> {
        let api_key = required(self.api_key, "api_key")?;
        let device_id = required(self.device_id, "device_id")?;
        let stream_name = required(self.stream_name, "stream_name")?;

        let api_url = self
            .api_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        reqwest::Url::parse(&api_url).map_err(|err| ConfigError::InvalidUrl {
            url: api_url.clone(),
            reason: err.to_string(),
        })?;

        Ok(ConnectorConfig {
            api_key,
            api_url,
            device_id,
            stream_name,
            start_time_ago: self.start_time_ago.unwrap_or(Duration::ZERO),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}
