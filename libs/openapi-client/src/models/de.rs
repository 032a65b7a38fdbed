//! Deserialization helpers for loosely typed wire fields

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string, a number or null and keep it as an optional string.
///
/// Coolify returns some identifiers (e.g. `application_id`) as strings on
/// some endpoints and as integers on others.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Accept a boolean encoded as `true`/`false`, `0`/`1` or null.
pub fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_i64().unwrap_or(0) != 0)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected boolean, got {}",
            other
        ))),
    }
}
