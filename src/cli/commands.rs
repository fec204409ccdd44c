//! CLI command definitions
//!
//! Clap-based command definitions for checking the environment against a
//! schema and scaffolding starter files for new projects.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::output::{CheckReport, OutputFormat};
use super::ExitCode;
use crate::engine::{EngineOptions, ValidationEngine};
use crate::error::ValidationError;
use crate::schema::EnvSchema;
use crate::source::{DotenvSource, LayeredSource, ProcessEnvSource};

/// Starter schema written by `init`
const SCHEMA_TEMPLATE: &str = r#"{
  "type": "object",
  "properties": {
    "NODE_ENV": {
      "type": "string",
      "enum": ["development", "production", "test"],
      "default": "development"
    },
    "PORT": {
      "type": "integer",
      "default": 3000,
      "minimum": 1,
      "maximum": 65535
    },
    "DATABASE_URL": {
      "type": "string",
      "format": "uri",
      "description": "Connection endpoint for the primary database"
    },
    "DEBUG": {
      "type": "boolean",
      "default": false
    }
  },
  "required": ["DATABASE_URL"]
}
"#;

/// Starter env example written by `init`
const ENV_EXAMPLE_TEMPLATE: &str = "# Example environment for this project.\n\
# Copy to .env and adjust the values.\n\
NODE_ENV=development\n\
PORT=3000\n\
DATABASE_URL=https://db.example.com\n\
DEBUG=false\n";

/// Environment validation CLI
///
/// Validate the process environment against a declarative schema, or
/// scaffold a starter schema for a new project.
#[derive(Parser, Debug)]
#[command(name = "env-validate")]
#[command(about = "Validate environment variables against a declarative schema", long_about = None)]
#[command(version)]
pub struct EnvCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: EnvCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// Check the environment against a schema
    ///
    /// Merges an optional .env file under the live process environment
    /// (live values win), validates the merged view, and reports errors,
    /// warnings, and resolved values.
    Check {
        /// Path to the schema file (JSON or YAML)
        #[arg(short, long, default_value = "env.schema.json")]
        schema: PathBuf,

        /// Path to a .env file merged under the live environment
        #[arg(short, long)]
        env_file: Option<PathBuf>,

        /// Output format for results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,

        /// Treat warnings as a failing exit code
        #[arg(long)]
        strict: bool,

        /// Do not warn about variables absent from the schema
        #[arg(long)]
        allow_unknown: bool,
    },

    /// Scaffold a starter schema and env example
    ///
    /// Writes a commented starter schema and a matching .env example.
    /// Existing files are left untouched unless --force is given.
    Init {
        /// Path of the schema file to create
        #[arg(short, long, default_value = "env.schema.json")]
        schema: PathBuf,

        /// Path of the env example file to create
        #[arg(long, default_value = ".env.example")]
        env_example: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

/// Execute the check command
pub fn execute_check(
    schema_path: PathBuf,
    env_file: Option<PathBuf>,
    format: Option<OutputFormat>,
    strict: bool,
    allow_unknown: bool,
) -> Result<ExitCode, ValidationError> {
    let schema_content = std::fs::read_to_string(&schema_path).map_err(|e| {
        ValidationError::FileError(format!(
            "Failed to read schema file '{}': {}",
            schema_path.display(),
            e
        ))
    })?;
    let schema_value = parse_schema_file(&schema_path, &schema_content)?;
    let schema = EnvSchema::from_value(&schema_value)?;

    let options = EngineOptions::new()
        .with_strict(strict)
        .with_allow_unknown(allow_unknown);

    // File layer first, live process layer second: live values win.
    let mut source = LayeredSource::new();
    if let Some(path) = env_file {
        source = source.with_layer(Box::new(DotenvSource::new(path)));
    }
    source = source.with_layer(Box::new(ProcessEnvSource::new()));

    let engine = ValidationEngine::new(schema, options).with_source(Box::new(source));
    let outcome = engine.validate();

    let output_format = format.unwrap_or(OutputFormat::Table);
    let report = CheckReport::from_outcome(&outcome);
    report.render(output_format)?;

    let has_errors = !outcome.valid;
    let has_warnings = outcome.warning_count() > 0;
    if strict && has_warnings {
        return Ok(ExitCode::ValidationError);
    }
    Ok(ExitCode::from_validation_result(has_errors, has_warnings))
}

/// Execute the init command
pub fn execute_init(
    schema_path: PathBuf,
    env_example_path: PathBuf,
    force: bool,
) -> Result<ExitCode, ValidationError> {
    use colored::Colorize;

    scaffold_file(&schema_path, SCHEMA_TEMPLATE, force)?;
    println!("{} wrote {}", "+".green(), schema_path.display());

    scaffold_file(&env_example_path, ENV_EXAMPLE_TEMPLATE, force)?;
    println!("{} wrote {}", "+".green(), env_example_path.display());

    Ok(ExitCode::Success)
}

fn scaffold_file(path: &Path, content: &str, force: bool) -> Result<(), ValidationError> {
    if path.exists() && !force {
        return Err(ValidationError::InvalidInput(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }
    std::fs::write(path, content).map_err(|e| {
        ValidationError::FileError(format!("Failed to write '{}': {}", path.display(), e))
    })
}

/// Parse a schema file based on its extension
fn parse_schema_file(path: &Path, content: &str) -> Result<serde_json::Value, ValidationError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e))),
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid YAML: {}", e))),
        _ => Err(ValidationError::InvalidInput(format!(
            "Unsupported schema format: {}. Supported formats: json, yaml, yml",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_json() {
        let content = r#"{"type": "object", "properties": {"PORT": {"type": "integer"}}}"#;
        let path = PathBuf::from("env.schema.json");
        let value = parse_schema_file(&path, content).unwrap();
        assert_eq!(value["type"], "object");
    }

    #[test]
    fn test_parse_schema_yaml() {
        let content = "type: object\nproperties:\n  PORT:\n    type: integer\n";
        let path = PathBuf::from("env.schema.yaml");
        let value = parse_schema_file(&path, content).unwrap();
        assert_eq!(value["properties"]["PORT"]["type"], "integer");
    }

    #[test]
    fn test_parse_schema_unsupported() {
        let path = PathBuf::from("env.schema.toml");
        assert!(parse_schema_file(&path, "type = \"object\"").is_err());
    }

    #[test]
    fn test_schema_template_is_loadable() {
        let value: serde_json::Value = serde_json::from_str(SCHEMA_TEMPLATE).unwrap();
        let schema = EnvSchema::from_value(&value).unwrap();
        assert!(schema.is_declared("PORT"));
        assert_eq!(schema.required(), &["DATABASE_URL".to_string()]);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("env.schema.json");
        let example = dir.path().join(".env.example");

        execute_init(schema.clone(), example.clone(), false).unwrap();
        assert!(schema.exists());
        assert!(example.exists());

        let err = execute_init(schema.clone(), example, false).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInput(_)));
    }
}
