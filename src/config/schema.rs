//! Configuration schema definitions for envstrap.
//!
//! This module contains the struct definitions that map to
//! the YAML configuration file format. Every field is optional;
//! an empty file (or no file at all) yields [`EnvstrapConfig::default`].

use serde::{Deserialize, Serialize};

/// Root configuration structure for `.envstrap/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvstrapConfig {
    /// Tool used to create the environment.
    pub creator: EnvCreator,

    /// Interpreter handed to the creator (e.g. `python3.12`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// What to do when a step fails.
    pub on_failure: FailurePolicy,

    /// Default output mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputMode>,

    /// Overrides for the version-control sourced dependency.
    pub omni_api: VcsOverride,
}

/// Tool that creates the isolated environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvCreator {
    /// The standalone `virtualenv` tool.
    #[default]
    Virtualenv,
    /// The interpreter's built-in `venv` module.
    Venv,
}

impl EnvCreator {
    /// Name shown to users and looked up on PATH.
    pub fn tool_name(&self, python: Option<&str>) -> String {
        match self {
            Self::Virtualenv => "virtualenv".to_string(),
            Self::Venv => python.unwrap_or(DEFAULT_PYTHON).to_string(),
        }
    }
}

/// Interpreter used by the `venv` creator when none is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// How the runner reacts to a failing step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing step.
    #[default]
    FailFast,
    /// Run every step; the last step decides the exit code.
    KeepGoing,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail_fast"),
            Self::KeepGoing => write!(f, "keep_going"),
        }
    }
}

/// Output mode as written in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    Normal,
    Quiet,
    Silent,
}

/// Location and pin for the version-control sourced dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VcsOverride {
    /// Repository URL (without the `git+` prefix).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Immutable commit id to install.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        let config: EnvstrapConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EnvstrapConfig::default());
        assert_eq!(config.creator, EnvCreator::Virtualenv);
        assert_eq!(config.on_failure, FailurePolicy::FailFast);
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
creator: venv
python: python3.12
on_failure: keep_going
output: quiet
omni_api:
  url: https://example.com/omni_api.git
  rev: 0123456789abcdef0123456789abcdef01234567
"#;
        let config: EnvstrapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.creator, EnvCreator::Venv);
        assert_eq!(config.python.as_deref(), Some("python3.12"));
        assert_eq!(config.on_failure, FailurePolicy::KeepGoing);
        assert_eq!(config.output, Some(OutputMode::Quiet));
        assert_eq!(
            config.omni_api.url.as_deref(),
            Some("https://example.com/omni_api.git")
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: std::result::Result<EnvstrapConfig, _> =
            serde_yaml::from_str("packages: [requests]");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_creator() {
        let result: std::result::Result<EnvstrapConfig, _> = serde_yaml::from_str("creator: conda");
        assert!(result.is_err());
    }

    #[test]
    fn creator_tool_names() {
        assert_eq!(EnvCreator::Virtualenv.tool_name(None), "virtualenv");
        assert_eq!(EnvCreator::Venv.tool_name(None), "python3");
        assert_eq!(EnvCreator::Venv.tool_name(Some("python3.11")), "python3.11");
    }

    #[test]
    fn failure_policy_display_matches_yaml() {
        assert_eq!(FailurePolicy::FailFast.to_string(), "fail_fast");
        assert_eq!(FailurePolicy::KeepGoing.to_string(), "keep_going");
    }
}
