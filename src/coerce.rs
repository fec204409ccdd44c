//! String-to-typed-value coercion
//!
//! Environment variables arrive as raw strings; coercion turns them into
//! typed values according to the declared property type. Parsing is strict:
//! a string that cannot represent the declared type is a `CoercionError`,
//! recovered by the engine into a per-key error entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::PropertyType;

/// Boolean vocabulary: tokens coerced to `true`
const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];

/// Boolean vocabulary: tokens coerced to `false` (the empty string included)
const FALSY: [&str; 5] = ["false", "0", "no", "off", ""];

/// A typed environment value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Integer(i64),
    Number(f64),
    Boolean(bool),
    String(String),
}

impl EnvValue {
    /// Numeric view of the value, when it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EnvValue::Integer(i) => Some(*i as f64),
            EnvValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of the value, when it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnvValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Value equality against a JSON value (for enum membership)
    pub fn matches_json(&self, other: &serde_json::Value) -> bool {
        match (self, other) {
            (EnvValue::String(s), serde_json::Value::String(o)) => s == o,
            (EnvValue::Boolean(b), serde_json::Value::Bool(o)) => b == o,
            (EnvValue::Integer(i), serde_json::Value::Number(n)) => {
                n.as_i64() == Some(*i) || n.as_f64() == Some(*i as f64)
            }
            (EnvValue::Number(v), serde_json::Value::Number(n)) => n.as_f64() == Some(*v),
            _ => false,
        }
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::String(s) => write!(f, "{}", s),
            EnvValue::Number(n) => write!(f, "{}", n),
            EnvValue::Integer(i) => write!(f, "{}", i),
            EnvValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Failure to represent a raw string as the declared type
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionError {
    message: String,
}

impl CoercionError {
    fn new(message: String) -> Self {
        Self { message }
    }

    /// The human-readable failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CoercionError {}

/// Coerce a raw string into a typed value per the declared type
///
/// - `string`: identity, always succeeds.
/// - `number`: parsed as `f64`; a failed parse (or NaN) is an error.
/// - `integer`: parsed like `number`, then truncated toward zero.
/// - `boolean`: case-insensitive, whitespace-trimmed vocabulary match;
///   the empty string coerces to `false`.
pub fn coerce(raw: &str, value_type: PropertyType) -> Result<EnvValue, CoercionError> {
    match value_type {
        PropertyType::String => Ok(EnvValue::String(raw.to_string())),
        PropertyType::Number => parse_numeral(raw, "a number").map(EnvValue::Number),
        PropertyType::Integer => {
            parse_numeral(raw, "an integer").map(|n| EnvValue::Integer(n.trunc() as i64))
        }
        PropertyType::Boolean => {
            let token = raw.trim().to_lowercase();
            if TRUTHY.contains(&token.as_str()) {
                Ok(EnvValue::Boolean(true))
            } else if FALSY.contains(&token.as_str()) {
                Ok(EnvValue::Boolean(false))
            } else {
                Err(CoercionError::new(format!(
                    "cannot parse \"{}\" as a boolean (expected one of: true, false, 1, 0, yes, no, on, off)",
                    raw
                )))
            }
        }
    }
}

fn parse_numeral(raw: &str, noun: &str) -> Result<f64, CoercionError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .ok_or_else(|| CoercionError::new(format!("cannot parse \"{}\" as {}", raw, noun)))
}

/// Represent a schema default as a typed value, when possible
///
/// Defaults are trusted schema input: a JSON value already matching the
/// declared type is taken as-is, a string default is coerced, and anything
/// else is silently not adopted.
pub fn coerce_default(
    default: &serde_json::Value,
    value_type: PropertyType,
) -> Option<EnvValue> {
    match (value_type, default) {
        (PropertyType::String, serde_json::Value::String(s)) => {
            Some(EnvValue::String(s.clone()))
        }
        (PropertyType::Number, serde_json::Value::Number(n)) => n.as_f64().map(EnvValue::Number),
        (PropertyType::Integer, serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(EnvValue::Integer),
        (PropertyType::Boolean, serde_json::Value::Bool(b)) => Some(EnvValue::Boolean(*b)),
        (_, serde_json::Value::String(s)) => coerce(s, value_type).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_string_identity() {
        assert_eq!(
            coerce("  anything goes ", PropertyType::String).unwrap(),
            EnvValue::String("  anything goes ".to_string())
        );
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(coerce("3.5", PropertyType::Number).unwrap(), EnvValue::Number(3.5));
        assert_eq!(coerce(" 42 ", PropertyType::Number).unwrap(), EnvValue::Number(42.0));
        assert!(coerce("abc", PropertyType::Number).is_err());
        assert!(coerce("NaN", PropertyType::Number).is_err());
    }

    #[test]
    fn test_integer_truncates_toward_zero() {
        assert_eq!(coerce("42", PropertyType::Integer).unwrap(), EnvValue::Integer(42));
        assert_eq!(coerce("3.9", PropertyType::Integer).unwrap(), EnvValue::Integer(3));
        assert_eq!(coerce("-3.9", PropertyType::Integer).unwrap(), EnvValue::Integer(-3));
        assert!(coerce("abc", PropertyType::Integer).is_err());
    }

    #[test]
    fn test_boolean_vocabulary() {
        for token in ["TRUE", "1", "yes", "on", " Yes "] {
            assert_eq!(
                coerce(token, PropertyType::Boolean).unwrap(),
                EnvValue::Boolean(true),
                "token {:?}",
                token
            );
        }
        for token in ["false", "0", "no", "off", "", "OFF"] {
            assert_eq!(
                coerce(token, PropertyType::Boolean).unwrap(),
                EnvValue::Boolean(false),
                "token {:?}",
                token
            );
        }
        assert!(coerce("maybe", PropertyType::Boolean).is_err());
        assert!(coerce("2", PropertyType::Boolean).is_err());
    }

    #[test]
    fn test_coerce_default() {
        use serde_json::json;

        assert_eq!(
            coerce_default(&json!(3000), PropertyType::Integer),
            Some(EnvValue::Integer(3000))
        );
        assert_eq!(
            coerce_default(&json!("8080"), PropertyType::Integer),
            Some(EnvValue::Integer(8080))
        );
        assert_eq!(
            coerce_default(&json!(false), PropertyType::Boolean),
            Some(EnvValue::Boolean(false))
        );
        assert_eq!(coerce_default(&json!([1, 2]), PropertyType::Integer), None);
    }

    proptest! {
        #[test]
        fn prop_integer_coercion_agrees_with_number(n in -1_000_000.0f64..1_000_000.0) {
            let raw = format!("{}", n);
            let as_number = coerce(&raw, PropertyType::Number).unwrap();
            let as_integer = coerce(&raw, PropertyType::Integer).unwrap();
            let expected = match as_number {
                EnvValue::Number(f) => f.trunc() as i64,
                _ => unreachable!(),
            };
            prop_assert_eq!(as_integer, EnvValue::Integer(expected));
        }

        #[test]
        fn prop_string_coercion_never_fails(raw in ".*") {
            prop_assert!(coerce(&raw, PropertyType::String).is_ok());
        }
    }
}
