//! Converting parsed readings into pipeline records.

use std::collections::BTreeMap;

use m2x_types::{datetime, Reading, StreamWindow};

/// Output routes a record can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Success,
    Failure,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Success => "success",
            Relationship::Failure => "failure",
        }
    }
}

/// How a record came to exist, for provenance reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Built by this connector from a fetched reading.
    Created,
}

/// Routing decision for the write path.
///
/// `penalize` asks the scheduler to deprioritize redelivery of the failed
/// record so a persistently failing one does not hot-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    pub relationship: Relationship,
    pub penalize: bool,
}

impl Disposition {
    pub fn success() -> Self {
        Self {
            relationship: Relationship::Success,
            penalize: false,
        }
    }

    pub fn failure() -> Self {
        Self {
            relationship: Relationship::Failure,
            penalize: false,
        }
    }

    pub fn failure_penalized() -> Self {
        Self {
            relationship: Relationship::Failure,
            penalize: true,
        }
    }
}

/// Attribute names carried by emitted records.
pub mod attr {
    pub const DEVICE_ID: &str = "device.id";
    pub const STREAM_NAME: &str = "stream.name";
    pub const STREAM_START: &str = "stream.start";
    pub const STREAM_END: &str = "stream.end";
    pub const STREAM_LIMIT: &str = "stream.limit";
    pub const VALUE_TIMESTAMP: &str = "stream.value.timestamp";
    pub const VALUE_MILLIS: &str = "stream.value.millis";
    /// Prefix for per-reading extra fields.
    pub const VALUE_PREFIX: &str = "stream.value.";
}

/// One record handed to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// The reading's value in textual form.
    pub payload: String,
    pub attributes: BTreeMap<String, String>,
    pub provenance: Provenance,
    pub relationship: Relationship,
}

/// Maps readings to records with a deterministic attribute set.
#[derive(Debug, Clone)]
pub struct RecordEmitter {
    device_id: String,
    stream_name: String,
}

impl RecordEmitter {
    pub fn new(device_id: impl Into<String>, stream_name: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            stream_name: stream_name.into(),
        }
    }

    /// Emit one record per reading, in window order.
    pub fn emit(&self, window: &StreamWindow) -> Vec<OutputRecord> {
        window
            .values
            .iter()
            .filter_map(|reading| self.record_for(window, reading))
            .collect()
    }

    fn record_for(&self, window: &StreamWindow, reading: &Reading) -> Option<OutputRecord> {
        let timestamp = reading.timestamp?;

        let mut attributes = BTreeMap::new();
        attributes.insert(attr::DEVICE_ID.to_string(), self.device_id.clone());
        attributes.insert(attr::STREAM_NAME.to_string(), self.stream_name.clone());
        if let Some(start) = &window.start {
            attributes.insert(attr::STREAM_START.to_string(), datetime::format(start));
        }
        if let Some(end) = &window.end {
            attributes.insert(attr::STREAM_END.to_string(), datetime::format(end));
        }
        if let Some(limit) = window.limit {
            attributes.insert(attr::STREAM_LIMIT.to_string(), limit.to_string());
        }
        attributes.insert(attr::VALUE_TIMESTAMP.to_string(), datetime::format(&timestamp));
        attributes.insert(
            attr::VALUE_MILLIS.to_string(),
            timestamp.timestamp_millis().to_string(),
        );
        for (key, value) in &reading.extra {
            attributes.insert(format!("{}{}", attr::VALUE_PREFIX, key), value.to_text());
        }

        Some(OutputRecord {
            payload: reading.value.to_text(),
            attributes,
            provenance: Provenance::Created,
            relationship: Relationship::Success,
        })
    }
}
