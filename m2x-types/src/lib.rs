//! # m2x-types
//!
//! Value model and wire codec for M2X device data streams.
//!
//! An M2X stream endpoint returns readings in windows: a JSON object with
//! optional `start`/`end`/`limit` metadata and a `values` array. Each value
//! carries an ISO-8601 `timestamp`, an untyped scalar `value`, and any number
//! of additional fields the remote side chooses to attach. This crate models
//! that shape faithfully:
//!
//! - [`ScalarValue`]: a closed tagged union over the JSON scalar types, so an
//!   integer reading stays an integer and a string stays a string.
//! - [`Reading`]: one timestamped data point plus its extra fields, with the
//!   extra fields kept in document order.
//! - [`StreamWindow`]: one fetch response worth of readings plus window
//!   metadata. Ordering is whatever the remote returned; nothing is re-sorted.
//!
//! ## Features
//!
//! - `serde`: JSON parsing and serialization of windows and readings.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "serde")] {
//! use m2x_types::StreamWindow;
//!
//! let body = br#"{"limit":2,"values":[{"timestamp":"2014-09-09T19:15:00.563Z","value":32}]}"#;
//! let window = StreamWindow::from_json_slice(body).unwrap();
//!
//! assert_eq!(window.limit, Some(2));
//! assert_eq!(window.values[0].value.to_text(), "32");
//! # }
//! ```

pub mod datetime;

mod reading;
mod scalar;
mod window;

pub use reading::Reading;
pub use scalar::ScalarValue;
pub use window::StreamWindow;
