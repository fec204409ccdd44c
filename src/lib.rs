//! Environment Variable Validation
//!
//! Validates a process's environment variables against a declarative
//! schema, coercing raw string values into typed values and reporting
//! structured errors and warnings.
//!
//! ## Features
//!
//! - **Schema-driven**: declare types, defaults, ranges, lengths, patterns,
//!   enums, and string formats per variable
//! - **Strict coercion**: string/number/integer/boolean with fixed parse
//!   semantics and a fixed boolean vocabulary
//! - **Structured outcomes**: errors, warnings, missing/invalid key
//!   classification, and resolved values in one immutable result
//! - **Unknown-key detection**: flags variables absent from the schema,
//!   skipping system-reserved prefixes
//! - **Layered sources**: merge a `.env` file under the live process
//!   environment, live values winning
//! - **CLI support**: `check` and `init` commands with colored table,
//!   JSON, and YAML output
//!
//! ## Architecture
//!
//! 1. **Schema** (`schema`): typed schema model, fatal-at-construction
//!    loading.
//! 2. **Coercion** (`coerce`): raw string to typed value.
//! 3. **Constraints** (`constraint`): range/length/pattern/enum/format
//!    checks on coerced values.
//! 4. **Engine** (`engine`): orchestrates coercion and checking, classifies
//!    outcomes; always returns, never raises.
//! 5. **Sources** (`source`): injected read-only environment snapshots.
//! 6. **CLI** (`cli`): argument parsing, rendering, exit codes.
//!
//! ## Example
//!
//! ```rust
//! use env_validation::{
//!     EngineOptions, EnvSchema, PropertySpec, PropertyType, ValidationEngine,
//! };
//! use env_validation::source::StaticSource;
//!
//! let schema = EnvSchema::empty()
//!     .with_property("PORT", PropertySpec::new(PropertyType::Integer))
//!     .with_property("API_KEY", PropertySpec::new(PropertyType::String))
//!     .with_required("API_KEY");
//!
//! let source = StaticSource::default()
//!     .with_entry("PORT", "8080")
//!     .with_entry("API_KEY", "local-dev-key");
//!
//! let engine = ValidationEngine::new(schema, EngineOptions::new())
//!     .with_source(Box::new(source));
//!
//! let outcome = engine.validate();
//! assert!(outcome.valid);
//! ```

pub mod cli;
pub mod coerce;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod schema;
pub mod source;

// Re-export the core types
pub use coerce::{coerce, CoercionError, EnvValue};
pub use engine::{is_reserved, EngineOptions, ValidationEngine, RESERVED_PREFIXES};
pub use error::{Result, ValidationError};
pub use outcome::{EnvVarError, EnvVarWarning, ValidationOutcome};
pub use schema::{EnvSchema, PropertySpec, PropertyType, ValueFormat};
pub use source::{DotenvSource, EnvSource, LayeredSource, ProcessEnvSource, StaticSource};

// Re-export CLI types for command-line usage
pub use cli::{CheckReport, EnvCli, EnvCommands, ExitCode, OutputFormat};

/// Tool version (from Cargo.toml)
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
pub fn run_cli(cli: EnvCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                ValidationError::FileError(_) => ExitCode::FileError,
                ValidationError::SchemaError(_) => ExitCode::SchemaError,
                ValidationError::InvalidInput(_) | ValidationError::ParseError(_) => {
                    ExitCode::InvalidInput
                }
                _ => ExitCode::InternalError,
            }
        }
    }
}
