//! Write-path publishing.

use tracing::error;

use m2x_types::{Reading, ScalarValue};

use crate::api::StreamApi;
use crate::config::ConnectorConfig;
use crate::emit::Disposition;

/// Best-effort publisher for one device stream.
///
/// One [`publish`](StreamPublisher::publish) is one network attempt. Failed
/// records are routed back to the scheduler through their
/// [`Disposition`] rather than retried here.
pub struct StreamPublisher<A> {
    api: A,
    device_id: String,
    stream_name: String,
}

impl<A: StreamApi> StreamPublisher<A> {
    pub fn new(config: &ConnectorConfig, api: A) -> Self {
        Self {
            api,
            device_id: config.device_id.clone(),
            stream_name: config.stream_name.clone(),
        }
    }

    /// Publish one record's content as the stream's newest value.
    ///
    /// The content is taken as UTF-8 text and always published as a string
    /// value; the remote stamps it on arrival. Empty or undecodable content
    /// fails without touching the network.
    pub async fn publish(&self, content: &[u8]) -> Disposition {
        let text = match std::str::from_utf8(content) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                error!(
                    "record for {}/{} is empty, nothing to publish",
                    self.device_id, self.stream_name
                );
                return Disposition::failure();
            }
            Err(err) => {
                error!(
                    "record for {}/{} is not valid UTF-8: {}",
                    self.device_id, self.stream_name, err
                );
                return Disposition::failure();
            }
        };

        let reading = Reading::new(ScalarValue::Text(text.to_string()));
        let body = match reading.to_json_vec() {
            Ok(body) => body,
            Err(err) => {
                error!(
                    "failed to serialize the value for {}/{}: {}",
                    self.device_id, self.stream_name, err
                );
                return Disposition::failure();
            }
        };

        match self
            .api
            .put_value(&self.device_id, &self.stream_name, body)
            .await
        {
            Ok(()) => Disposition::success(),
            Err(err) => {
                error!(
                    "publish to {}/{} failed: {}",
                    self.device_id, self.stream_name, err
                );
                Disposition::failure_penalized()
            }
        }
    }
}
