//! Output formatting for the CLI
//!
//! Renders a validation outcome as a colored human-readable report or as
//! JSON/YAML for machine consumption. Errors are printed before warnings,
//! warnings before the missing/invalid key summaries.

use clap::ValueEnum;
use colored::Colorize;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::coerce::EnvValue;
use crate::error::ValidationError;
use crate::outcome::{EnvVarError, EnvVarWarning, ValidationOutcome};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable report with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format for machine processing
    Yaml,
}

/// Renderable view of a validation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Overall validation status
    pub valid: bool,
    /// Number of errors found
    pub error_count: usize,
    /// Number of warnings found
    pub warning_count: usize,
    /// All errors, in processing order
    pub errors: Vec<EnvVarError>,
    /// All warnings, in processing order
    pub warnings: Vec<EnvVarWarning>,
    /// Required variables that were absent or empty
    pub missing_keys: Vec<String>,
    /// Variables whose values failed coercion or a constraint
    pub invalid_keys: Vec<String>,
    /// Resolved values (coerced or defaulted)
    pub values: IndexMap<String, EnvValue>,
    /// Summary message
    pub summary: String,
}

impl CheckReport {
    /// Create a report from a validation outcome
    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        let error_count = outcome.error_count();
        let warning_count = outcome.warning_count();

        let summary = if outcome.valid && warning_count == 0 {
            "Environment is valid".to_string()
        } else if outcome.valid {
            format!("Environment is valid with {} warning(s)", warning_count)
        } else {
            format!(
                "Environment has {} error(s) and {} warning(s)",
                error_count, warning_count
            )
        };

        Self {
            valid: outcome.valid,
            error_count,
            warning_count,
            errors: outcome.errors.clone(),
            warnings: outcome.warnings.clone(),
            missing_keys: outcome.missing_keys.clone(),
            invalid_keys: outcome.invalid_keys.clone(),
            values: outcome.values.clone(),
            summary,
        }
    }

    /// Render the report in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), ValidationError> {
        match format {
            OutputFormat::Json => self.render_json(),
            OutputFormat::Yaml => self.render_yaml(),
            OutputFormat::Table => self.render_table(),
        }
    }

    fn render_json(&self) -> Result<(), ValidationError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::SerializationError(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }

    fn render_yaml(&self) -> Result<(), ValidationError> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| ValidationError::SerializationError(e.to_string()))?;
        println!("{}", yaml);
        Ok(())
    }

    fn render_table(&self) -> Result<(), ValidationError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Environment Validation".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        let status_icon = if self.valid { "+".green() } else { "x".red() };
        writeln!(stdout, "{} {}", status_icon, self.summary).ok();
        writeln!(stdout).ok();

        if !self.errors.is_empty() {
            writeln!(stdout, "{}", "Errors:".red().bold()).ok();
            for error in &self.errors {
                writeln!(stdout, "  {} {}", "x".red(), error.message).ok();
                if let Some(value) = &error.value {
                    writeln!(stdout, "    {} {}", "Value:".dimmed(), value.yellow()).ok();
                }
                if let Some(expected) = &error.expected_type {
                    writeln!(
                        stdout,
                        "    {} {}",
                        "Expected:".dimmed(),
                        expected.to_string().cyan()
                    )
                    .ok();
                }
            }
            writeln!(stdout).ok();
        }

        if !self.warnings.is_empty() {
            writeln!(stdout, "{}", "Warnings:".yellow().bold()).ok();
            for warning in &self.warnings {
                writeln!(stdout, "  {} {}", "!".yellow(), warning.message).ok();
            }
            writeln!(stdout).ok();
        }

        if !self.missing_keys.is_empty() {
            writeln!(
                stdout,
                "{} {}",
                "Missing keys:".red().bold(),
                self.missing_keys.join(", ")
            )
            .ok();
        }
        if !self.invalid_keys.is_empty() {
            writeln!(
                stdout,
                "{} {}",
                "Invalid keys:".red().bold(),
                self.invalid_keys.join(", ")
            )
            .ok();
        }
        if !self.missing_keys.is_empty() || !self.invalid_keys.is_empty() {
            writeln!(stdout).ok();
        }

        if !self.values.is_empty() {
            writeln!(stdout, "{}", "Resolved values:".cyan().bold()).ok();
            for (key, value) in &self.values {
                writeln!(stdout, "  {} = {}", key.bold(), value.to_string().dimmed()).ok();
            }
        }

        stdout.flush().ok();
        Ok(())
    }
}
