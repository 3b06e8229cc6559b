//! A single timestamped stream reading.

use chrono::{DateTime, Utc};

use crate::ScalarValue;

/// One data point from a device stream.
///
/// Parsed readings always carry a timestamp; the window codec rejects
/// elements without one. A reading built for publishing carries none, and the
/// serialized form then omits the field entirely (the remote side stamps the
/// value on arrival).
///
/// `extra` holds every JSON key beyond `timestamp` and `value`, verbatim and
/// in document order. These surface as per-reading record attributes on the
/// read path and are never re-emitted on the write path.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: ScalarValue,
    pub extra: Vec<(String, ScalarValue)>,
}

impl Reading {
    /// A fresh reading for publishing, with no timestamp and no extra fields.
    pub fn new(value: ScalarValue) -> Self {
        Self {
            timestamp: None,
            value,
            extra: Vec::new(),
        }
    }

    /// A timestamped reading.
    pub fn with_timestamp(timestamp: DateTime<Utc>, value: ScalarValue) -> Self {
        Self {
            timestamp: Some(timestamp),
            value,
            extra: Vec::new(),
        }
    }

    /// Look up an extra field by key.
    pub fn extra(&self, key: &str) -> Option<&ScalarValue> {
        self.extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[cfg(feature = "serde")]
impl Reading {
    /// Serialize for publishing: `{"timestamp": ..., "value": ...}` with the
    /// timestamp omitted when absent and extra fields never included.
    pub fn to_json_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Reading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let len = 1 + usize::from(self.timestamp.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(ts) = &self.timestamp {
            map.serialize_entry("timestamp", &crate::datetime::format(ts))?;
        }
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Reading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let fields = serde_json::Map::deserialize(deserializer)?;

        let mut timestamp = None;
        let mut value = ScalarValue::Null;
        let mut extra = Vec::new();

        for (key, raw) in fields {
            match key.as_str() {
                "timestamp" => {
                    let text = raw
                        .as_str()
                        .ok_or_else(|| D::Error::custom("timestamp must be a string"))?;
                    let parsed = crate::datetime::parse(text).map_err(|e| {
                        D::Error::custom(format!("invalid timestamp {text:?}: {e}"))
                    })?;
                    timestamp = Some(parsed);
                }
                "value" => value = ScalarValue::from_json(raw),
                _ => extra.push((key, ScalarValue::from_json(raw))),
            }
        }

        let timestamp = timestamp.ok_or_else(|| D::Error::missing_field("timestamp"))?;

        Ok(Reading {
            timestamp: Some(timestamp),
            value,
            extra,
        })
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::datetime;

    #[test]
    fn parses_timestamp_value_and_extras_in_order() {
        let json = r#"{"timestamp":"2014-09-09T19:15:00.563Z","value":32,"quality":"good","rssi":-70}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();

        assert_eq!(
            reading.timestamp,
            Some(datetime::parse("2014-09-09T19:15:00.563Z").unwrap())
        );
        assert_eq!(reading.value, ScalarValue::Integer(32));
        assert_eq!(
            reading.extra,
            vec![
                ("quality".to_string(), ScalarValue::Text("good".into())),
                ("rssi".to_string(), ScalarValue::Integer(-70)),
            ]
        );
    }

    #[test]
    fn missing_timestamp_is_an_error() {
        let err = serde_json::from_str::<Reading>(r#"{"value":32}"#).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn unparsable_timestamp_is_an_error() {
        let json = r#"{"timestamp":"yesterday","value":32}"#;
        assert!(serde_json::from_str::<Reading>(json).is_err());
    }

    #[test]
    fn non_string_timestamp_is_an_error() {
        let json = r#"{"timestamp":1410290100563,"value":32}"#;
        assert!(serde_json::from_str::<Reading>(json).is_err());
    }

    #[test]
    fn missing_value_parses_as_null() {
        let json = r#"{"timestamp":"2014-09-09T19:15:00.563Z"}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(reading.value.is_null());
    }

    #[test]
    fn extra_lookup_by_key() {
        let json = r#"{"timestamp":"2014-09-09T19:15:00.563Z","value":1,"quality":"good"}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(
            reading.extra("quality"),
            Some(&ScalarValue::Text("good".into()))
        );
        assert_eq!(reading.extra("missing"), None);
    }

    #[test]
    fn publish_form_omits_timestamp_when_absent() {
        let reading = Reading::new(ScalarValue::Text("21.5".into()));
        let bytes = reading.to_json_vec().unwrap();
        assert_eq!(bytes, br#"{"value":"21.5"}"#);
    }

    #[test]
    fn publish_form_keeps_timestamp_when_present() {
        let ts = datetime::parse("2014-09-09T19:15:00.563Z").unwrap();
        let reading = Reading::with_timestamp(ts, ScalarValue::Integer(32));
        let bytes = reading.to_json_vec().unwrap();
        assert_eq!(
            bytes,
            br#"{"timestamp":"2014-09-09T19:15:00.563Z","value":32}"#
        );
    }

    #[test]
    fn extras_are_not_serialized() {
        let json = r#"{"timestamp":"2014-09-09T19:15:00.563Z","value":32,"quality":"good"}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        let out = String::from_utf8(reading.to_json_vec().unwrap()).unwrap();
        assert!(!out.contains("quality"));
    }

    #[test]
    fn serialize_reparse_keeps_textual_form() {
        let ts = datetime::parse("2014-09-09T19:15:00.563Z").unwrap();
        for value in [
            ScalarValue::Integer(32),
            ScalarValue::Float(29.5),
            ScalarValue::Text("bears".into()),
            ScalarValue::Bool(false),
        ] {
            let bytes = Reading::with_timestamp(ts, value.clone()).to_json_vec().unwrap();
            let back: Reading = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(back.value.to_text(), value.to_text());
        }
    }
}
