//! Library half of the `pm-report` binary.
//!
//! Holds everything the command implementations in `main.rs` share:
//! exit codes, the CLI error type, logging setup, settings mapping and
//! file helpers.

pub mod error;
pub mod exit_codes;
pub mod files;
pub mod logging;
pub mod settings;

pub use error::{CliError, Result};
pub use exit_codes::ExitCode;
