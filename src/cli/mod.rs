//! CLI module
//!
//! Command-line plumbing around the validation engine: argument parsing,
//! exit-code mapping, and output rendering. The engine itself never exits
//! or prints; everything user-visible lives here.

pub mod commands;
pub mod output;

pub use commands::{EnvCli, EnvCommands};
pub use output::{CheckReport, OutputFormat};

use crate::error::ValidationError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, validation passed
    Success = 0,
    /// Validation failed with errors
    ValidationError = 1,
    /// Validation passed with warnings
    ValidationWarning = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Schema-related errors
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from validation results
    pub fn from_validation_result(has_errors: bool, has_warnings: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else if has_warnings {
            ExitCode::ValidationWarning
        } else {
            ExitCode::Success
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: EnvCli) -> Result<ExitCode, ValidationError> {
    match cli.command {
        EnvCommands::Check {
            schema,
            env_file,
            format,
            strict,
            allow_unknown,
        } => commands::execute_check(schema, env_file, format, strict, allow_unknown),
        EnvCommands::Init {
            schema,
            env_example,
            force,
        } => commands::execute_init(schema, env_example, force),
    }
}
