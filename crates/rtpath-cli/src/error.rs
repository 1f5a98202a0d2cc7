//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from core errors to exit codes and user-facing messages.

use rtpath_core::{PathError, StepError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Path configuration failed; no user code may run.
    #[error("Fatal error: {0}")]
    PathConfig(#[from] StepError),

    /// An environment variable could not be used.
    #[error("Fatal error: reading environment: {0}")]
    Environment(#[from] PathError),

    /// Output could not be written or serialized.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow the runtime's conventions:
    /// - 1: Fatal startup error
    /// - 74: Output error (`EX_IOERR`)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::PathConfig(_) | Self::Environment(_) => 1,
            Self::Io(_) => 74,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}
