//! Error types for envstrap operations.
//!
//! This module defines [`EnvstrapError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `EnvstrapError` for conditions that stop a command before it can
//!   report a result (bad config, missing project root)
//! - A failing bootstrap step is data, carried in a
//!   [`StepResult`](crate::runner::StepResult), not an error
//! - Use `anyhow::Error` (via `EnvstrapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envstrap operations.
#[derive(Debug, Error)]
pub enum EnvstrapError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    /// A tool needed by a step is not on PATH.
    #[error("Tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The environment's activation entry point is missing.
    #[error("Cannot activate environment: {path} does not exist")]
    ActivationFailed { path: PathBuf },

    /// A child process could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EnvstrapError {
    /// Whether this error came from loading or validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
        )
    }
}

/// Result type alias for envstrap operations.
pub type Result<T> = std::result::Result<T, EnvstrapError>;
