//! # m2x-connector
//!
//! Bidirectional connector between a data-flow pipeline and the AT&T M2X
//! device data API.
//!
//! The read side polls a stream's values endpoint incrementally: a persisted
//! cursor (the previous window's end time) bounds each fetch, every returned
//! reading becomes one pipeline record with a deterministic attribute set,
//! and the cursor advances only after a fully successful invocation. The
//! write side publishes one incoming record as the stream's newest value,
//! best effort, one attempt per invocation.
//!
//! ```text
//!             ┌──────────────┐  GET /values?start=…   ┌───────────┐
//!  poll ────▶ │ StreamReader │ ─────────────────────▶ │  M2X API  │
//!             └──────┬───────┘                        └───────────┘
//!        CursorStore │ RecordEmitter                        ▲
//!             ┌──────▼─────┐      ┌─────────────────┐       │ PUT /value
//!             │ StateStore │      │ StreamPublisher │ ──────┘
//!             └────────────┘      └─────────────────┘
//! ```
//!
//! Scheduling, back-pressure and redelivery belong to the surrounding
//! pipeline: [`Poll::Yield`] and [`Disposition`] are the signals it
//! consumes. The scheduler must guarantee at most one concurrent invocation
//! per configured stream endpoint; the connector takes no cursor lock of its
//! own, so a violated guarantee can lose a cursor update.
//!
//! ## Example
//!
//! ```rust,no_run
//! use m2x_connector::{ConnectorConfig, FileStateStore, HttpStreamApi, Poll, StreamReader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectorConfig::builder()
//!         .api_key("0123456789abcdef")
//!         .device_id("65b89448f954f49e42b746d73b385cbb")
//!         .stream_name("temperature")
//!         .build()?;
//!
//!     let api = HttpStreamApi::new(&config);
//!     let store = FileStateStore::new("m2x-state.json");
//!     let reader = StreamReader::new(&config, api, store);
//!
//!     match reader.poll().await? {
//!         Poll::Emitted(records) => println!("{} new reading(s)", records.len()),
//!         Poll::Yield => println!("nothing delivered, try again later"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod duration;
pub mod emit;
pub mod error;
pub mod publish;
pub mod reader;
pub mod state;

pub use api::{HttpStreamApi, StreamApi, API_KEY_HEADER};
pub use config::{ConfigError, ConnectorConfig, DEFAULT_API_URL};
pub use emit::{Disposition, OutputRecord, Provenance, RecordEmitter, Relationship};
pub use error::{ConnectorError, StateError};
pub use publish::StreamPublisher;
pub use reader::{Poll, StreamReader};
pub use state::{CursorStore, FileStateStore, MemoryStateStore, StateStore, START_TIME_KEY};

// Re-export the value model for convenience
pub use m2x_types::{Reading, ScalarValue, StreamWindow};
