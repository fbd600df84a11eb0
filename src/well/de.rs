//! Serde helpers for the loosely typed fields of well documents
//!
//! Model documents store numbers either as JSON numbers or as strings, use
//! `""` for "not set", and use `"yes"` / `"no"` for flags.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::time::parse_date;
use chrono::NaiveDate;

/// Number stored as a JSON number or numeric string; blank or null is `None`
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Date stored as a string
pub fn value_as_date(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(parse_date)
}

/// Whether a value is the blank marker (`""` or null)
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn blank_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(None);
    }
    value_as_f64(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {}", value)))
}

pub fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected yes/no, got {}", other))),
        },
        other => Err(serde::de::Error::custom(format!("expected yes/no, got {}", other))),
    }
}
