//! Constraint checking for coerced values
//!
//! A property's constraints are evaluated independently against the coerced
//! value; every violated constraint contributes a message, and the engine
//! surfaces the first one per key. Constraints that do not apply to the
//! value's type are skipped without error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::coerce::EnvValue;
use crate::schema::{PropertySpec, ValueFormat};

/// Check a coerced value against a property's constraints
///
/// Returns the violation messages in constraint order; an empty vector
/// means the value passes.
pub fn check(value: &EnvValue, spec: &PropertySpec) -> Vec<String> {
    let mut violations = Vec::new();

    if let Some(allowed) = &spec.allowed_values {
        if !allowed.iter().any(|member| value.matches_json(member)) {
            let rendered: Vec<String> = allowed.iter().map(render_json).collect();
            violations.push(format!(
                "value \"{}\" is not one of the allowed values: {}",
                value,
                rendered.join(", ")
            ));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = spec.minimum {
            if number < min {
                violations.push(format!("value {} is below minimum {}", value, min));
            }
        }
        if let Some(max) = spec.maximum {
            if number > max {
                violations.push(format!("value {} exceeds maximum {}", value, max));
            }
        }
    }

    if let Some(s) = value.as_str() {
        let length = s.chars().count();
        if let Some(min) = spec.min_length {
            if length < min {
                violations.push(format!(
                    "length {} is below minimum length {}",
                    length, min
                ));
            }
        }
        if let Some(max) = spec.max_length {
            if length > max {
                violations.push(format!("length {} exceeds maximum length {}", length, max));
            }
        }

        if let Some(pattern) = &spec.pattern {
            // An unparseable pattern is skipped, like any inapplicable constraint.
            if let Ok(re) = Regex::new(pattern) {
                if !re.is_match(s) {
                    violations.push(format!("value does not match pattern \"{}\"", pattern));
                }
            }
        }

        if let Some(format) = spec.format {
            if !matches_format(s, format) {
                violations.push(format!("value is not a valid {}", format_noun(format)));
            }
        }
    }

    violations
}

fn render_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_noun(format: ValueFormat) -> &'static str {
    match format {
        ValueFormat::Email => "email address",
        ValueFormat::Uri => "http(s) URI",
        ValueFormat::Uuid => "UUID",
        ValueFormat::Date => "ISO-8601 date",
        ValueFormat::Time => "ISO-8601 time",
        ValueFormat::DateTime => "ISO-8601 date-time",
    }
}

/// Apply the fixed recognizer for a named format
pub fn matches_format(s: &str, format: ValueFormat) -> bool {
    match format {
        ValueFormat::Email => is_email(s),
        ValueFormat::Uri => is_http_uri(s),
        ValueFormat::Uuid => is_uuid(s),
        ValueFormat::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        ValueFormat::Time => NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok(),
        ValueFormat::DateTime => {
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        }
    }
}

/// Exactly one `@`, a non-whitespace local part, and a non-whitespace
/// domain part containing a dot.
fn is_email(s: &str) -> bool {
    if s.matches('@').count() != 1 {
        return false;
    }
    let (local, domain) = match s.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    !local.is_empty()
        && !local.contains(char::is_whitespace)
        && !domain.is_empty()
        && !domain.contains(char::is_whitespace)
        && domain.contains('.')
}

fn is_http_uri(s: &str) -> bool {
    s.strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty())
}

/// 8-4-4-4-12 hexadecimal grouping, case-insensitive
fn is_uuid(s: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PropertySpec, PropertyType};
    use serde_json::json;

    #[test]
    fn test_enum_membership() {
        let spec = PropertySpec::new(PropertyType::String)
            .with_allowed_values(vec![json!("development"), json!("production")]);

        assert!(check(&EnvValue::String("production".into()), &spec).is_empty());

        let violations = check(&EnvValue::String("staging".into()), &spec);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("allowed values"));
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let spec = PropertySpec::new(PropertyType::Integer).with_range(Some(1.0), Some(65535.0));

        assert!(check(&EnvValue::Integer(1), &spec).is_empty());
        assert!(check(&EnvValue::Integer(65535), &spec).is_empty());
        assert!(check(&EnvValue::Integer(0), &spec)[0].contains("below minimum"));
        assert!(check(&EnvValue::Integer(70000), &spec)[0].contains("exceeds maximum"));
    }

    #[test]
    fn test_string_length_bounds() {
        let spec = PropertySpec::new(PropertyType::String).with_length(Some(3), Some(5));

        assert!(check(&EnvValue::String("abc".into()), &spec).is_empty());
        assert!(check(&EnvValue::String("ab".into()), &spec)[0].contains("below minimum length"));
        assert!(
            check(&EnvValue::String("toolong".into()), &spec)[0].contains("exceeds maximum length")
        );
    }

    #[test]
    fn test_pattern() {
        let spec = PropertySpec::new(PropertyType::String).with_pattern("^[a-z]+$");
        assert!(check(&EnvValue::String("abc".into()), &spec).is_empty());
        assert!(!check(&EnvValue::String("ABC".into()), &spec).is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let spec = PropertySpec::new(PropertyType::String).with_pattern("(unclosed");
        assert!(check(&EnvValue::String("anything".into()), &spec).is_empty());
    }

    #[test]
    fn test_inapplicable_constraints_are_skipped() {
        // Length and pattern on a numeric value apply to nothing.
        let spec = PropertySpec::new(PropertyType::Integer)
            .with_length(Some(100), None)
            .with_pattern("^x$");
        assert!(check(&EnvValue::Integer(7), &spec).is_empty());
    }

    #[test]
    fn test_violations_accumulate() {
        let spec = PropertySpec::new(PropertyType::String)
            .with_length(Some(10), None)
            .with_pattern("^[0-9]+$");
        let violations = check(&EnvValue::String("abc".into()), &spec);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_email_recognizer() {
        assert!(matches_format("user@example.com", ValueFormat::Email));
        assert!(!matches_format("user@@example.com", ValueFormat::Email));
        assert!(!matches_format("user@example", ValueFormat::Email));
        assert!(!matches_format("@example.com", ValueFormat::Email));
        assert!(!matches_format("us er@example.com", ValueFormat::Email));
    }

    #[test]
    fn test_uri_recognizer() {
        assert!(matches_format("https://example.com", ValueFormat::Uri));
        assert!(matches_format("http://x", ValueFormat::Uri));
        assert!(!matches_format("http://", ValueFormat::Uri));
        assert!(!matches_format("ftp://example.com", ValueFormat::Uri));
    }

    #[test]
    fn test_uuid_recognizer() {
        assert!(matches_format(
            "550e8400-e29b-41d4-a716-446655440000",
            ValueFormat::Uuid
        ));
        assert!(matches_format(
            "550E8400-E29B-41D4-A716-446655440000",
            ValueFormat::Uuid
        ));
        assert!(!matches_format("550e8400e29b41d4a716446655440000", ValueFormat::Uuid));
        assert!(!matches_format(
            "550e8400-e29b-41d4-a716-44665544000g",
            ValueFormat::Uuid
        ));
    }

    #[test]
    fn test_temporal_recognizers() {
        assert!(matches_format("2024-02-29", ValueFormat::Date));
        assert!(!matches_format("2023-02-29", ValueFormat::Date));
        assert!(matches_format("13:45:30", ValueFormat::Time));
        assert!(!matches_format("25:00:00", ValueFormat::Time));
        assert!(matches_format("2024-01-15T10:30:00Z", ValueFormat::DateTime));
        assert!(matches_format("2024-01-15T10:30:00", ValueFormat::DateTime));
        assert!(!matches_format("2024-01-15 10:30:00", ValueFormat::DateTime));
    }
}
