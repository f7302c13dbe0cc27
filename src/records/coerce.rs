//! Coercion of loosely-typed JSON values into the strict column types.

use crate::error::RecordError;
use serde_json::Value;

pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingField(field))
}

fn not_coercible(field: &'static str, expected: &'static str, value: &Value) -> RecordError {
    RecordError::NotCoercible {
        field,
        expected,
        value: value.to_string(),
    }
}

fn integral_f64_to_i64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Integers, integral floats (`2004.0`) and numeric strings are accepted.
pub fn to_i64(field: &'static str, value: &Value) -> Result<i64, RecordError> {
    let coerced = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64_to_i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64_to_i64))
        }
        _ => None,
    };
    coerced.ok_or_else(|| not_coercible(field, "integer", value))
}

pub fn to_f64(field: &'static str, value: &Value) -> Result<f64, RecordError> {
    let coerced = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| not_coercible(field, "float", value))
}

pub fn required_i64(field: &'static str, value: Option<&Value>) -> Result<i64, RecordError> {
    to_i64(field, require(field, value)?)
}

pub fn required_f64(field: &'static str, value: Option<&Value>) -> Result<f64, RecordError> {
    to_f64(field, require(field, value)?)
}

/// Missing and `null` both map to `None`.
pub fn optional_f64(field: &'static str, value: Option<&Value>) -> Result<Option<f64>, RecordError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => to_f64(field, v).map(Some),
    }
}
