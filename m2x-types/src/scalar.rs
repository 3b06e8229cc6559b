//! Untyped stream values.

/// A single stream value as delivered by the remote API.
///
/// M2X streams are dynamically typed: one stream can carry numbers, strings
/// or booleans, and the JSON document is the only source of type information.
/// Each variant keeps the original JSON type so a reading parsed from `32`
/// stays an integer rather than collapsing into a string.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl ScalarValue {
    /// The textual form used for record payloads and attributes.
    ///
    /// Integers render without a decimal point (`32`), floats via their
    /// shortest round-trip form (`29.5`), and `Null` as the literal `null`.
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::Integer(n) => n.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Text(s) => s.clone(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Null => "null".to_string(),
        }
    }

    /// True for the `Null` variant.
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

#[cfg(feature = "serde")]
impl ScalarValue {
    /// Convert a decoded JSON value, keeping its scalar type.
    ///
    /// Arrays and objects have no scalar counterpart; they are carried as
    /// text holding their compact JSON form.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ScalarValue::Null,
            serde_json::Value::Bool(b) => ScalarValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ScalarValue::Integer(i),
                None => ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ScalarValue::Text(s),
            other => ScalarValue::Text(other.to_string()),
        }
    }

    /// Convert back to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ScalarValue::Integer(n) => serde_json::Value::from(*n),
            ScalarValue::Float(f) => serde_json::Value::from(*f),
            ScalarValue::Text(s) => serde_json::Value::from(s.clone()),
            ScalarValue::Bool(b) => serde_json::Value::from(*b),
            ScalarValue::Null => serde_json::Value::Null,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ScalarValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ScalarValue::Integer(n) => serializer.serialize_i64(*n),
            ScalarValue::Float(f) => serializer.serialize_f64(*f),
            ScalarValue::Text(s) => serializer.serialize_str(s),
            ScalarValue::Bool(b) => serializer.serialize_bool(*b),
            ScalarValue::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ScalarValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(ScalarValue::from_json(value))
    }
}
