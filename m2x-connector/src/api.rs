//! HTTP access to the M2X streams API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ConnectorConfig;
use crate::error::ConnectorError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the range query URL for a stream's values.
///
/// `start` is appended as given; the remote accepts ISO-8601 instants
/// verbatim, so the string is not re-encoded. An empty start is treated as
/// absent.
pub fn stream_values_url(
    base_url: &str,
    device_id: &str,
    stream_name: &str,
    start: Option<&str>,
) -> String {
    let mut url = format!(
        "{}/devices/{}/streams/{}/values",
        base_url.trim_end_matches('/'),
        device_id,
        stream_name
    );

    if let Some(start) = start.filter(|s| !s.is_empty()) {
        url.push_str("?start=");
        url.push_str(start);
    }

    url
}

/// URL for publishing a single stream value.
pub fn stream_value_url(base_url: &str, device_id: &str, stream_name: &str) -> String {
    format!(
        "{}/devices/{}/streams/{}/value",
        base_url.trim_end_matches('/'),
        device_id,
        stream_name
    )
}

/// One-attempt access to a device stream endpoint.
///
/// One call is one request: no internal retry, no backoff. The surrounding
/// scheduler decides when to try again.
#[async_trait]
pub trait StreamApi: Send + Sync {
    /// Fetch the values window at or after `start`.
    async fn fetch_values(
        &self,
        device_id: &str,
        stream_name: &str,
        start: Option<&str>,
    ) -> Result<Vec<u8>, ConnectorError>;

    /// Publish one serialized reading as the stream's newest value.
    async fn put_value(
        &self,
        device_id: &str,
        stream_name: &str,
        body: Vec<u8>,
    ) -> Result<(), ConnectorError>;
}

/// [`StreamApi`] over HTTP with an API-key header.
#[derive(Debug, Clone)]
pub struct HttpStreamApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpStreamApi {
    pub fn new(config: &ConnectorConfig) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl StreamApi for HttpStreamApi {
    async fn fetch_values(
        &self,
        device_id: &str,
        stream_name: &str,
        start: Option<&str>,
    ) -> Result<Vec<u8>, ConnectorError> {
        let url = stream_values_url(&self.base_url, device_id, stream_name, start);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Remote {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn put_value(
        &self,
        device_id: &str,
        stream_name: &str,
        body: Vec<u8>,
    ) -> Result<(), ConnectorError> {
        let url = stream_value_url(&self.base_url, device_id, stream_name);

        let response = self
            .client
            .put(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Remote {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_url_without_start() {
        let url = stream_values_url("http://api-m2x.att.com/v2/", "dev1", "temperature", None);
        assert_eq!(
            url,
            "http://api-m2x.att.com/v2/devices/dev1/streams/temperature/values"
        );
    }

    #[test]
    fn values_url_with_start() {
        let url = stream_values_url(
            "http://api-m2x.att.com/v2/",
            "dev1",
            "temperature",
            Some("2014-09-30T23:59:59.000Z"),
        );
        assert_eq!(
            url,
            "http://api-m2x.att.com/v2/devices/dev1/streams/temperature/values?start=2014-09-30T23:59:59.000Z"
        );
    }

    #[test]
    fn empty_start_is_treated_as_absent() {
        let url = stream_values_url("http://api-m2x.att.com/v2/", "dev1", "temperature", Some(""));
        assert!(!url.contains("start="));
    }

    #[test]
    fn all_trailing_slashes_are_trimmed() {
        let url = stream_values_url("http://example.com/v2///", "dev1", "temperature", None);
        assert_eq!(url, "http://example.com/v2/devices/dev1/streams/temperature/values");
    }

    #[test]
    fn base_url_without_trailing_slash_works() {
        let url = stream_values_url("http://example.com/v2", "dev1", "temperature", None);
        assert_eq!(url, "http://example.com/v2/devices/dev1/streams/temperature/values");
    }

    #[test]
    fn value_url_for_publishing() {
        let url = stream_value_url("http://api-m2x.att.com/v2/", "dev1", "temperature");
        assert_eq!(
            url,
            "http://api-m2x.att.com/v2/devices/dev1/streams/temperature/value"
        );
    }
}
