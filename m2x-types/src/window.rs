//! One fetch response worth of stream readings.

use chrono::{DateTime, Utc};

use crate::Reading;

/// A windowed collection of readings with range metadata.
///
/// Mirrors the response of `GET .../streams/{name}/values`: the remote
/// reports the window it evaluated (`start`, `end`, an optional `limit`) plus
/// the readings inside it, chronologically ascending. The ordering is taken
/// as-is; consumers see readings exactly as the remote returned them.
///
/// Windows are consumed within the invocation that fetched them and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamWindow {
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "crate::datetime::opt"
        )
    )]
    pub start: Option<DateTime<Utc>>,

    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "crate::datetime::opt"
        )
    )]
    pub end: Option<DateTime<Utc>>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub limit: Option<u32>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<Reading>,
}

impl StreamWindow {
    /// True when the window holds no readings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of readings in the window.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(feature = "serde")]
impl StreamWindow {
    /// Parse a raw response body.
    ///
    /// `start`, `end` and `limit` are optional; a missing `values` key yields
    /// an empty window. Anything else malformed (top level not an object,
    /// `values` not an array, a reading without a parsable timestamp) is an
    /// error.
    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
