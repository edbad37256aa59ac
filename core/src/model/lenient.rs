//! Forgiving serde helpers for stored records.
//!
//! Entries written by older versions of the app (or edited by hand) can hold
//! numbers as strings, `null`, or plain garbage. None of that may fail a load:
//! every numeric field is coerced, and anything unusable becomes zero.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::model::entry::{EveningMode, ResistanceSet};

pub(crate) fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or_else(|_| {
            warn!(raw = %s, "non-numeric field coerced to 0");
            0.0
        }),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(other) => {
            warn!(raw = %other, "non-numeric field coerced to 0");
            0.0
        }
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_number(value.as_ref()))
}

/// `None` for missing, null or non-positive values.
pub fn positive_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let n = number(deserializer)?;
    Ok(if n > 0.0 { Some(n) } else { None })
}

/// Non-negative integer counts (steps, sets, reps). Negatives clamp to 0.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = number(deserializer)?;
    Ok(if n > 0.0 {
        n.round().min(u32::MAX as f64) as u32
    } else {
        0
    })
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        other => coerce_number(other.as_ref()) != 0.0,
    })
}

pub fn evening_mode<'de, D>(deserializer: D) -> Result<EveningMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => EveningMode::default(),
    })
}

/// Anything that is not an array yields no sessions; array items that are not
/// objects are dropped.
pub fn sessions<'de, D>(deserializer: D) -> Result<Vec<ResistanceSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!(index, value = %item, "dropping resistance set that is not an object");
                return None;
            }
            match serde_json::from_value::<ResistanceSet>(item) {
                Ok(set) => Some(set),
                Err(err) => {
                    warn!(index, error = %err, "dropping undecodable resistance set");
                    None
                }
            }
        })
        .collect())
}

/// Any scalar as text; null and containers read as empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// RFC 3339 strings or epoch milliseconds.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(Some(&json!(12.5))), 12.5);
        assert_eq!(coerce_number(Some(&json!("42"))), 42.0);
        assert_eq!(coerce_number(Some(&json!(" 7 "))), 7.0);
        assert_eq!(coerce_number(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(null))), 0.0);
        assert_eq!(coerce_number(Some(&json!([1, 2]))), 0.0);
        assert_eq!(coerce_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }
}
