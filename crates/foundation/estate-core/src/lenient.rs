//! Lenient field decoders
//!
//! Used with `#[serde(deserialize_with = ...)]`. Each decoder accepts any
//! JSON value and yields `None` when the value is not usable for the field.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Finite JSON number, anything else is absent
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_number))
}

/// Finite, non-negative JSON number
pub fn non_negative<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.filter(|v| *v >= 0.0))
}

/// Integral JSON number that fits the target type
pub fn integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(as_integer)
        .and_then(|v| T::try_from(v).ok()))
}

/// Non-blank string; numbers are kept as their text form
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Read a finite number out of an arbitrary JSON value.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "non_negative")]
        area: Option<f64>,
        #[serde(default, deserialize_with = "integer")]
        year: Option<i32>,
        #[serde(default, deserialize_with = "text")]
        label: Option<String>,
    }

    fn sample(value: Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_number_ignores_non_numbers() {
        assert_eq!(sample(json!({"amount": 12.5})).amount, Some(12.5));
        assert_eq!(sample(json!({"amount": "12.5"})).amount, None);
        assert_eq!(sample(json!({"amount": null})).amount, None);
        assert_eq!(sample(json!({"amount": true})).amount, None);
        assert_eq!(sample(json!({})).amount, None);
    }

    #[test]
    fn test_non_negative_drops_negative_area() {
        assert_eq!(sample(json!({"area": 0})).area, Some(0.0));
        assert_eq!(sample(json!({"area": -3})).area, None);
    }

    #[test]
    fn test_integer_accepts_integral_floats() {
        assert_eq!(sample(json!({"year": 1987})).year, Some(1987));
        assert_eq!(sample(json!({"year": 1987.0})).year, Some(1987));
        assert_eq!(sample(json!({"year": 1987.5})).year, None);
        assert_eq!(sample(json!({"year": "1987"})).year, None);
    }

    #[test]
    fn test_text_keeps_numbers_and_drops_blanks() {
        assert_eq!(sample(json!({"label": "EG"})).label.as_deref(), Some("EG"));
        assert_eq!(sample(json!({"label": 2})).label.as_deref(), Some("2"));
        assert_eq!(sample(json!({"label": "   "})).label, None);
        assert_eq!(sample(json!({"label": ["x"]})).label, None);
    }
}
