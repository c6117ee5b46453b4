//! Strict per-field coercions from loosely-typed JSON values.
//!
//! Each function either fully interprets the input as the target kind or
//! fails with [`MessageError::InvalidValue`]. Nothing is truncated, rounded
//! or defaulted.

use crate::message::error::{MessageError, MessageResult};
use serde_json::{Map, Value};

/// Coerces a value to an integer.
///
/// Accepts JSON integers, JSON floats with no fractional part, and text
/// holding a base-10 integer.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] for anything else, including
/// booleans, fractional numbers and text such as `"12.5"`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use telemetry_intake::message::coercion::fields::coerce_integer;
///
/// assert_eq!(coerce_integer("minute", &json!("40")).ok(), Some(40));
/// assert_eq!(coerce_integer("hour", &json!(12.0)).ok(), Some(12));
/// assert!(coerce_integer("hour", &json!("noint")).is_err());
/// ```
pub fn coerce_integer(field: &str, value: &Value) -> MessageResult<i64> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_f64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| MessageError::invalid_value(field, format!("{value} is not an integer")))
}

/// Coerces a value to a finite floating point number.
///
/// Accepts any JSON number and text holding a finite decimal number.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] for anything else, including
/// booleans and text such as `"NaN"` or `"maybe not."`.
pub fn coerce_float(field: &str, value: &Value) -> MessageResult<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|number| number.is_finite())
        .ok_or_else(|| MessageError::invalid_value(field, format!("{value} is not a number")))
}

/// Coerces a value to text.
///
/// Strings are taken as-is. Any other value, `null` and containers
/// included, uses its JSON text unless `strings_only` is set.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] for non-string values when
/// `strings_only` is set.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use telemetry_intake::message::coercion::fields::coerce_text;
///
/// let radio = coerce_text("radio", &json!(["a"]), false).expect("coerced to text");
/// assert_eq!(radio, r#"["a"]"#);
/// assert!(coerce_text("radio", &json!(null), true).is_err());
/// ```
pub fn coerce_text(field: &str, value: &Value, strings_only: bool) -> MessageResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        _ if strings_only => Err(MessageError::invalid_value(
            field,
            format!("{value} is not text"),
        )),
        _ => Ok(value.to_string()),
    }
}

/// Requires a value to be a JSON object.
///
/// # Errors
///
/// Returns [`MessageError::TypeMismatch`] if `value` is not an object.
pub fn require_object<'a>(field: &str, value: &'a Value) -> MessageResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| MessageError::type_mismatch(field, "a mapping"))
}

/// Looks up a required key in a mapping.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] naming the key if it is absent.
pub fn require_key<'a>(map: &'a Map<String, Value>, key: &str) -> MessageResult<&'a Value> {
    map.get(key)
        .ok_or_else(|| MessageError::invalid_value(key, "required key is missing"))
}

/// Checks an integer lies within `min..=max`.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] when it does not.
pub fn check_integer_range(field: &str, value: i64, min: i64, max: i64) -> MessageResult<i64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(MessageError::invalid_value(
            field,
            format!("{value} is outside {min}..={max}"),
        ))
    }
}

/// Checks a float lies within `min..=max`.
///
/// # Errors
///
/// Returns [`MessageError::InvalidValue`] when it does not.
pub fn check_float_range(field: &str, value: f64, min: f64, max: f64) -> MessageResult<f64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(MessageError::invalid_value(
            field,
            format!("{value} is outside {min}..={max}"),
        ))
    }
}

/// Converts a float to an integer only when no information is lost.
#[expect(
    clippy::cast_possible_truncation,
    reason = "fract and range are checked before the cast"
)]
fn integral_f64(number: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let in_range = number >= -LIMIT && number < LIMIT;
    (number.fract() == 0.0 && in_range).then_some(number as i64)
}
