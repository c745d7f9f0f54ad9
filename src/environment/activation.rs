//! Scoped activation.
//!
//! Sourcing an activation script rewrites the caller's environment for the
//! rest of its life. Here activation is a value: the variables the script
//! would set, applied to each child process that needs them and to nothing
//! else.

use std::collections::BTreeMap;

use crate::error::{EnvstrapError, Result};
use crate::requirements::Requirement;
use crate::shell::{path_separator, Invocation};

use super::layout::EnvLayout;

/// Variables the activation script clears.
const CLEARED_VARS: &[&str] = &["PYTHONHOME"];

/// Activation context for an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedEnv {
    layout: EnvLayout,
    vars: BTreeMap<String, String>,
}

impl ActivatedEnv {
    /// Activate an existing environment.
    ///
    /// # Errors
    ///
    /// `ActivationFailed` if the activation entry point is missing.
    pub fn activate(layout: &EnvLayout, inherited_path: Option<&str>) -> Result<Self> {
        let script = layout.activate_script();
        if !script.is_file() {
            return Err(EnvstrapError::ActivationFailed { path: script });
        }
        Ok(Self::assume(layout, inherited_path))
    }

    /// Build the context without checking the disk.
    ///
    /// Used for dry runs and when failures are tolerated.
    pub fn assume(layout: &EnvLayout, inherited_path: Option<&str>) -> Self {
        let scripts = layout.scripts_dir().display().to_string();
        let path = match inherited_path {
            Some(rest) if !rest.is_empty() => format!("{}{}{}", scripts, path_separator(), rest),
            _ => scripts,
        };

        let mut vars = BTreeMap::new();
        vars.insert(
            "VIRTUAL_ENV".to_string(),
            layout.root().display().to_string(),
        );
        vars.insert("PATH".to_string(), path);

        Self {
            layout: layout.clone(),
            vars,
        }
    }

    /// The environment this context activates.
    pub fn layout(&self) -> &EnvLayout {
        &self.layout
    }

    /// Variables set for child processes.
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Apply the context to an invocation.
    pub fn apply(&self, mut invocation: Invocation) -> Invocation {
        invocation
            .env
            .extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        invocation
            .env_remove
            .extend(CLEARED_VARS.iter().map(|v| v.to_string()));
        invocation
    }

    /// The installer invocation for one requirement.
    pub fn install(&self, requirement: &Requirement) -> Invocation {
        let invocation = Invocation::new(self.layout.installer(), self.layout.root())
            .args(requirement.install_args());
        self.apply(invocation)
    }
}
