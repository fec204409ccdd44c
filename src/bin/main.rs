//! Environment validation CLI
//!
//! # Usage
//!
//! ```bash
//! # Check the live environment against a schema
//! env-validate check --schema env.schema.json
//!
//! # Merge a .env file under the live environment first
//! env-validate check --schema env.schema.json --env-file .env
//!
//! # Scaffold a starter schema and env example
//! env-validate init
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - validation passed
//! - 1: Validation failed with errors
//! - 2: Validation passed with warnings
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Schema-related errors
//! - 10: Internal error

use clap::Parser;
use env_validation::{run_cli, EnvCli};

fn main() {
    let cli = EnvCli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose > 0 {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    // Run the CLI and exit with appropriate code
    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
