//! Instant parsing and rendering.
//!
//! M2X exchanges instants as ISO-8601 strings with millisecond precision and
//! a `Z` suffix (`2014-09-09T19:15:00.563Z`). Parsing accepts any RFC 3339
//! offset and normalizes to UTC; rendering always uses the millisecond `Z`
//! form so a stored cursor round-trips byte for byte.

use chrono::{DateTime, SecondsFormat, Utc};

/// Parse an ISO-8601 instant, normalizing to UTC.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Render an instant as ISO-8601 with millisecond precision, `Z`-suffixed.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for optional instant fields.
///
/// Absent and `null` both map to `None`; present values must parse as
/// ISO-8601 or deserialization fails.
#[cfg(feature = "serde")]
pub mod opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
