//! Schema model for environment validation
//!
//! An environment schema is a flat object schema: each property names an
//! environment variable and carries the declared type plus optional
//! constraints. Property declaration order is preserved and drives the
//! order in which variables are processed and reported.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ValidationError};

/// Declared type of an environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Raw string value
    String,
    /// Floating-point numeric value
    Number,
    /// Whole-number value (parsed as a numeral, truncated toward zero)
    Integer,
    /// Boolean value with a fixed truthy/falsy vocabulary
    Boolean,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::String => write!(f, "string"),
            PropertyType::Number => write!(f, "number"),
            PropertyType::Integer => write!(f, "integer"),
            PropertyType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Recognized string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueFormat {
    Email,
    Uri,
    Uuid,
    Date,
    Time,
    DateTime,
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFormat::Email => write!(f, "email"),
            ValueFormat::Uri => write!(f, "uri"),
            ValueFormat::Uuid => write!(f, "uuid"),
            ValueFormat::Date => write!(f, "date"),
            ValueFormat::Time => write!(f, "time"),
            ValueFormat::DateTime => write!(f, "date-time"),
        }
    }
}

/// Constraints for a single environment variable
///
/// The declared `type` is the only mandatory field. Constraint fields apply
/// to their matching types; a constraint that does not apply to the coerced
/// value is silently skipped rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Declared value type
    #[serde(rename = "type")]
    pub value_type: PropertyType,

    /// Default substituted when the variable is unset or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Allowed values (value equality)
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<serde_json::Value>>,

    /// Regular expression the (string) value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Inclusive numeric lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive numeric upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Inclusive minimum string length
    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Inclusive maximum string length
    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Named string format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueFormat>,

    /// Human-readable description (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySpec {
    /// Create a bare spec with only a declared type
    pub fn new(value_type: PropertyType) -> Self {
        Self {
            value_type,
            default: None,
            allowed_values: None,
            pattern: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            format: None,
            description: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the allowed values
    pub fn with_allowed_values(mut self, values: Vec<serde_json::Value>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    /// Set numeric bounds
    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Set string length bounds
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Set the pattern constraint
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the format constraint
    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// A parsed environment schema
///
/// Immutable once constructed; `from_value` is the only fallible boundary.
/// A name listed in `required` without a matching property declaration is
/// tolerated: it is still checked for presence, and simply can never pass
/// beyond the presence check.
#[derive(Debug, Clone)]
pub struct EnvSchema {
    properties: IndexMap<String, PropertySpec>,
    required: Vec<String>,
}

impl EnvSchema {
    /// Build a schema from a parsed JSON value
    ///
    /// Asserts only that `type` is `"object"` and that `properties` is a
    /// mapping; property specs themselves must deserialize cleanly. Any
    /// violation aborts construction with a schema error.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let schema_type = value.get("type").and_then(|t| t.as_str());
        if schema_type != Some("object") {
            return Err(ValidationError::schema_error(
                "schema root must declare type \"object\"",
            ));
        }

        let raw_properties = value
            .get("properties")
            .and_then(|p| p.as_object())
            .ok_or_else(|| {
                ValidationError::schema_error("schema must contain a \"properties\" mapping")
            })?;

        let mut properties = IndexMap::with_capacity(raw_properties.len());
        for (name, raw_spec) in raw_properties {
            let spec: PropertySpec =
                serde_json::from_value(raw_spec.clone()).map_err(|e| {
                    ValidationError::schema_error(format!(
                        "malformed property \"{}\": {}",
                        name, e
                    ))
                })?;
            properties.insert(name.clone(), spec);
        }

        let required = value
            .get("required")
            .and_then(|r| r.as_array())
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            properties,
            required,
        })
    }

    /// Build a schema from raw JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ValidationError::schema_error(format!("invalid schema JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Create an empty schema (useful as a builder seed)
    pub fn empty() -> Self {
        Self {
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Declare a property
    pub fn with_property(mut self, name: impl Into<String>, spec: PropertySpec) -> Self {
        self.properties.insert(name.into(), spec);
        self
    }

    /// Mark a name as required
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Declared properties, in declaration order
    pub fn properties(&self) -> &IndexMap<String, PropertySpec> {
        &self.properties
    }

    /// Required names, in list order
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Look up a declared property
    pub fn get(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.get(name)
    }

    /// Check whether a name is declared among the properties
    pub fn is_declared(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_value() {
        let value = json!({
            "type": "object",
            "properties": {
                "PORT": { "type": "integer", "default": 3000 },
                "NODE_ENV": { "type": "string", "enum": ["development", "production"] }
            },
            "required": ["NODE_ENV"]
        });

        let schema = EnvSchema::from_value(&value).unwrap();
        assert_eq!(schema.properties().len(), 2);
        assert_eq!(schema.required(), &["NODE_ENV".to_string()]);
        assert_eq!(schema.get("PORT").unwrap().value_type, PropertyType::Integer);
    }

    #[test]
    fn test_schema_preserves_declaration_order() {
        let content = r#"{
            "type": "object",
            "properties": {
                "ZEBRA": { "type": "string" },
                "ALPHA": { "type": "string" },
                "MIDDLE": { "type": "string" }
            }
        }"#;

        let schema = EnvSchema::from_json_str(content).unwrap();
        let names: Vec<&String> = schema.properties().keys().collect();
        assert_eq!(names, ["ZEBRA", "ALPHA", "MIDDLE"]);
    }

    #[test]
    fn test_schema_rejects_non_object_root() {
        let value = json!({ "type": "array", "properties": {} });
        assert!(EnvSchema::from_value(&value).is_err());

        let value = json!({ "properties": {} });
        assert!(EnvSchema::from_value(&value).is_err());
    }

    #[test]
    fn test_schema_rejects_missing_properties() {
        let value = json!({ "type": "object" });
        assert!(EnvSchema::from_value(&value).is_err());
    }

    #[test]
    fn test_schema_rejects_malformed_property() {
        let value = json!({
            "type": "object",
            "properties": { "PORT": { "type": "decimal" } }
        });
        let err = EnvSchema::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_required_without_declaration_is_tolerated() {
        let value = json!({
            "type": "object",
            "properties": {},
            "required": ["GHOST"]
        });
        let schema = EnvSchema::from_value(&value).unwrap();
        assert_eq!(schema.required(), &["GHOST".to_string()]);
        assert!(!schema.is_declared("GHOST"));
    }

    #[test]
    fn test_format_parsing() {
        let value = json!({
            "type": "object",
            "properties": {
                "CALLBACK_URL": { "type": "string", "format": "uri" },
                "STARTED_AT": { "type": "string", "format": "date-time" }
            }
        });
        let schema = EnvSchema::from_value(&value).unwrap();
        assert_eq!(schema.get("CALLBACK_URL").unwrap().format, Some(ValueFormat::Uri));
        assert_eq!(schema.get("STARTED_AT").unwrap().format, Some(ValueFormat::DateTime));
    }
}
