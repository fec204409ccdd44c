//! Validation outcome model
//!
//! The outcome is the single artifact a validation run produces: an
//! immutable snapshot of errors, warnings, key classifications, and the
//! resolved values. Entries are plain value objects created fresh per run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coerce::EnvValue;
use crate::schema::PropertyType;

/// A per-variable validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVarError {
    /// The environment variable the error refers to
    pub key: String,
    /// Human-readable message
    pub message: String,
    /// The offending raw value, when one was present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The declared type, when the error is type-related
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<PropertyType>,
}

impl EnvVarError {
    /// Create a new error entry
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            value: None,
            expected_type: None,
        }
    }

    /// Attach the offending raw value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach the declared type
    pub fn with_expected_type(mut self, expected: PropertyType) -> Self {
        self.expected_type = Some(expected);
        self
    }
}

impl fmt::Display for EnvVarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A per-variable validation warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVarWarning {
    /// The environment variable the warning refers to
    pub key: String,
    /// Human-readable message
    pub message: String,
    /// The associated raw value, when one was present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EnvVarWarning {
    /// Create a new warning entry
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Attach the associated raw value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for EnvVarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result of one validation run
///
/// Collections keep processing order: required-list order for missing keys,
/// schema-declaration order for per-property errors and resolved values,
/// environment-map order for unknown-key warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether validation passed (no errors; warnings do not block)
    pub valid: bool,
    /// All errors, in processing order
    pub errors: Vec<EnvVarError>,
    /// All warnings, in processing order
    pub warnings: Vec<EnvVarWarning>,
    /// Required names that were absent or empty
    pub missing_keys: Vec<String>,
    /// Declared names whose values failed coercion or a constraint
    pub invalid_keys: Vec<String>,
    /// Successfully adopted values (coerced or default-substituted)
    pub values: IndexMap<String, EnvValue>,
}

impl ValidationOutcome {
    /// Compose an outcome; `valid` is derived from error presence
    pub fn compose(
        errors: Vec<EnvVarError>,
        warnings: Vec<EnvVarWarning>,
        missing_keys: Vec<String>,
        invalid_keys: Vec<String>,
        values: IndexMap<String, EnvValue>,
    ) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            missing_keys,
            invalid_keys,
            values,
        }
    }

    /// An outcome carrying a single internal failure under the given key
    pub fn internal_failure(key: &str, message: impl Into<String>) -> Self {
        Self::compose(
            vec![EnvVarError::new(key, message)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            IndexMap::new(),
        )
    }

    /// Number of errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Look up a resolved value
    pub fn value(&self, key: &str) -> Option<&EnvValue> {
        self.values.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_iff_no_errors() {
        let empty = ValidationOutcome::compose(
            Vec::new(),
            vec![EnvVarWarning::new("PORT", "Using default value for \"PORT\"")],
            Vec::new(),
            Vec::new(),
            IndexMap::new(),
        );
        assert!(empty.valid);

        let with_error = ValidationOutcome::compose(
            vec![EnvVarError::new("API_KEY", "missing")],
            Vec::new(),
            vec!["API_KEY".to_string()],
            Vec::new(),
            IndexMap::new(),
        );
        assert!(!with_error.valid);
    }

    #[test]
    fn test_error_builders() {
        let err = EnvVarError::new("PORT", "Invalid value for \"PORT\"")
            .with_value("abc")
            .with_expected_type(PropertyType::Integer);
        assert_eq!(err.value.as_deref(), Some("abc"));
        assert_eq!(err.expected_type, Some(PropertyType::Integer));
    }

    #[test]
    fn test_internal_failure() {
        let outcome = ValidationOutcome::internal_failure("__env_validation__", "boom");
        assert!(!outcome.valid);
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.errors[0].key, "__env_validation__");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let outcome = ValidationOutcome::compose(
            vec![EnvVarError::new("A", "bad").with_value("x")],
            vec![EnvVarWarning::new("B", "odd")],
            vec!["A".to_string()],
            Vec::new(),
            IndexMap::from([("C".to_string(), EnvValue::Integer(1))]),
        );
        let json = serde_json::to_string(&outcome).unwrap();
        let back: ValidationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, back);
    }
}
