//! Validation engine
//!
//! Orchestrates coercion and constraint checking across all schema
//! properties and all loaded variables, classifies outcomes, and produces
//! a single immutable `ValidationOutcome`. Construction is the only
//! fallible boundary; `validate` always returns an outcome, never an error.

use indexmap::IndexMap;

use crate::coerce::{coerce, coerce_default};
use crate::constraint::check;
use crate::error::Result;
use crate::outcome::{EnvVarError, EnvVarWarning, ValidationOutcome};
use crate::schema::EnvSchema;
use crate::source::{EnvSource, ProcessEnvSource};

/// Prefixes of system-reserved variables never reported as unknown
pub const RESERVED_PREFIXES: [&str; 6] = ["npm_", "NODE_", "PATH", "HOME", "USER", "SHELL"];

/// Key under which internal engine failures are reported
pub const INTERNAL_KEY: &str = "__env_validation__";

/// Recognized engine options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Reserved for future constraint strictness tuning; the engine accepts
    /// it but does not change behavior on it. The CLI maps it to exit codes.
    pub strict: bool,
    /// Suppress the unknown-variable scan entirely
    pub allow_unknown: bool,
}

impl EngineOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set whether unknown variables are tolerated silently
    pub fn with_allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }
}

/// The environment validation engine
///
/// Holds an immutable schema and an injected environment source. Multiple
/// engines may validate concurrently; each run reads an independent
/// snapshot and writes only to its own freshly allocated outcome.
pub struct ValidationEngine {
    schema: EnvSchema,
    options: EngineOptions,
    source: Box<dyn EnvSource>,
}

impl ValidationEngine {
    /// Create an engine over an already-parsed schema
    ///
    /// The live process environment is the default source; replace it with
    /// [`with_source`](Self::with_source).
    pub fn new(schema: EnvSchema, options: EngineOptions) -> Self {
        Self {
            schema,
            options,
            source: Box::new(ProcessEnvSource::new()),
        }
    }

    /// Create an engine from a parsed JSON schema value
    ///
    /// A missing or malformed schema aborts construction; no partial
    /// engine is usable.
    pub fn from_value(value: &serde_json::Value, options: EngineOptions) -> Result<Self> {
        Ok(Self::new(EnvSchema::from_value(value)?, options))
    }

    /// Replace the environment source
    pub fn with_source(mut self, source: Box<dyn EnvSource>) -> Self {
        self.source = source;
        self
    }

    /// The engine's schema
    pub fn schema(&self) -> &EnvSchema {
        &self.schema
    }

    /// The engine's options
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Validate a snapshot taken from the configured source
    ///
    /// Always returns an outcome. A source failure is folded into a
    /// single-element error result under [`INTERNAL_KEY`] instead of
    /// propagating.
    pub fn validate(&self) -> ValidationOutcome {
        match self.source.snapshot() {
            Ok(env) => self.validate_map(&env),
            Err(e) => {
                tracing::warn!(error = %e, "environment snapshot failed");
                ValidationOutcome::internal_failure(
                    INTERNAL_KEY,
                    format!("failed to load environment sources: {}", e),
                )
            }
        }
    }

    /// Validate an explicit environment map
    ///
    /// Pure computation over the given snapshot; the engine's own state is
    /// never touched.
    pub fn validate_map(&self, env: &IndexMap<String, String>) -> ValidationOutcome {
        tracing::debug!(
            properties = self.schema.properties().len(),
            variables = env.len(),
            "validating environment"
        );

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut missing_keys = Vec::new();
        let mut invalid_keys = Vec::new();
        let mut values = IndexMap::new();

        // Required names: absence and emptiness are treated identically.
        for name in self.schema.required() {
            let unset = env.get(name).map_or(true, |v| v.is_empty());
            if unset {
                missing_keys.push(name.clone());
                errors.push(EnvVarError::new(
                    name.as_str(),
                    format!("Required environment variable \"{}\" is missing or empty", name),
                ));
            }
        }

        // Declared properties, in declaration order.
        for (name, spec) in self.schema.properties() {
            let raw = env.get(name).filter(|v| !v.is_empty());

            let raw = match raw {
                Some(raw) => raw,
                None => {
                    // Unset or empty: adopt the default when one exists,
                    // otherwise skip; only the required check above may
                    // flag an unset property.
                    if let Some(default) = &spec.default {
                        if let Some(value) = coerce_default(default, spec.value_type) {
                            values.insert(name.clone(), value);
                            warnings.push(EnvVarWarning::new(
                                name.as_str(),
                                format!("Using default value for \"{}\"", name),
                            ));
                        }
                    }
                    continue;
                }
            };

            match coerce(raw, spec.value_type) {
                Err(e) => {
                    invalid_keys.push(name.clone());
                    errors.push(
                        EnvVarError::new(
                            name.as_str(),
                            format!("Invalid value for \"{}\": {}", name, e.message()),
                        )
                        .with_value(raw.as_str())
                        .with_expected_type(spec.value_type),
                    );
                }
                Ok(value) => {
                    let violations = check(&value, spec);
                    if let Some(first) = violations.first() {
                        invalid_keys.push(name.clone());
                        errors.push(
                            EnvVarError::new(
                                name.as_str(),
                                format!("Invalid value for \"{}\": {}", name, first),
                            )
                            .with_value(raw.as_str()),
                        );
                    } else {
                        values.insert(name.clone(), value);
                    }
                }
            }
        }

        // Unknown variables, in map order.
        if !self.options.allow_unknown {
            for name in env.keys() {
                if self.schema.is_declared(name) || is_reserved(name) {
                    continue;
                }
                warnings.push(EnvVarWarning::new(
                    name.as_str(),
                    format!("Unknown environment variable \"{}\" not defined in schema", name),
                ));
            }
        }

        ValidationOutcome::compose(errors, warnings, missing_keys, invalid_keys, values)
    }
}

/// Check whether a variable name carries a system-reserved prefix
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
}
