//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - `python` must be a bare interpreter name or path
//! - `omni_api.url` must be a URL the installer can clone
//! - `omni_api.rev` must be an immutable commit id

use crate::config::schema::EnvstrapConfig;
use crate::error::{EnvstrapError, Result};
use crate::requirements::Revision;

/// URL schemes the installer can clone from.
const VCS_SCHEMES: &[&str] = &["https://", "http://", "ssh://", "git://", "file://"];

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field, dotted for nested keys.
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &EnvstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(python) = &config.python {
        if python.trim().is_empty() || python.chars().any(char::is_whitespace) {
            errors.push(ValidationError {
                field: "python".to_string(),
                message: format!("'{}' is not an interpreter name or path", python),
            });
        }
    }

    if let Some(url) = &config.omni_api.url {
        errors.extend(validate_vcs_url(url));
    }

    if let Some(rev) = &config.omni_api.rev {
        if let Err(message) = Revision::parse(rev) {
            errors.push(ValidationError {
                field: "omni_api.rev".to_string(),
                message,
            });
        }
    }

    errors
}

fn validate_vcs_url(url: &str) -> Option<ValidationError> {
    let message = if !VCS_SCHEMES.iter().any(|s| url.starts_with(s)) {
        format!(
            "'{}' must start with one of: {}",
            url,
            VCS_SCHEMES.join(", ")
        )
    } else if url.chars().any(char::is_whitespace) {
        format!("'{}' contains whitespace", url)
    } else if url.contains('#') {
        format!("'{}' must not carry a fragment", url)
    } else {
        return None;
    };

    Some(ValidationError {
        field: "omni_api.url".to_string(),
        message,
    })
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &EnvstrapConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        Err(EnvstrapError::ConfigValidationError {
            field: fields.join(", "),
            message: messages.join("; "),
        })
    }
}
