//! Configuration file discovery and loading.
//!
//! A project has at most one config file. The first of these wins:
//! 1. An explicit path (`--config` or `ENVSTRAP_CONFIG`)
//! 2. Project config (`.envstrap/config.yml`)
//!
//! No file means defaults.

use crate::config::schema::EnvstrapConfig;
use crate::config::validator::validate;
use crate::error::{EnvstrapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".envstrap";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly requested path.
    Explicit(PathBuf),
    /// Discovered in the project.
    Project(PathBuf),
    /// Built-in defaults.
    Defaults,
}

impl ConfigSource {
    /// Path of the file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) => Some(p),
            Self::Defaults => None,
        }
    }
}

/// Locate the config file for a project.
///
/// An explicit path is returned even if it does not exist, so that
/// loading reports it as missing instead of silently using defaults.
/// A relative explicit path is joined to `project_root`; the binary makes
/// `--config` absolute against the working directory before calling this.
pub fn discover(project_root: &Path, explicit: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        let path = if path.is_relative() {
            project_root.join(path)
        } else {
            path.to_path_buf()
        };
        return ConfigSource::Explicit(path);
    }

    let path = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
    if path.is_file() {
        ConfigSource::Project(path)
    } else {
        ConfigSource::Defaults
    }
}

/// Load a single config file and parse it into [`EnvstrapConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<EnvstrapConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvstrapError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`EnvstrapConfig`].
///
/// Blank or comment-only files parse as defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<EnvstrapConfig> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| EnvstrapError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    if value.is_null() {
        return Ok(EnvstrapConfig::default());
    }

    serde_yaml::from_value(value).map_err(|e| EnvstrapError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate the effective config for a project.
pub fn load_config(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<(EnvstrapConfig, ConfigSource)> {
    let source = discover(project_root, explicit);

    let config = match source.path() {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(path)?
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            EnvstrapConfig::default()
        }
    };

    validate(&config)?;
    Ok((config, source))
}
