//! The ordered bootstrap plan.

use std::fmt;
use std::path::Path;

use crate::config::EnvstrapConfig;
use crate::environment::{create_invocation, EnvLayout};
use crate::requirements::{Manifest, Requirement};
use crate::shell::Invocation;

/// One step of the bootstrap, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapStep {
    /// Create the environment; `None` when it already exists.
    CreateEnvironment { invocation: Option<Invocation> },
    /// Build the activation context.
    Activate,
    /// Install one requirement with the environment's installer.
    Install(Requirement),
}

impl BootstrapStep {
    /// Short name used in progress output and summaries.
    pub fn name(&self) -> String {
        match self {
            Self::CreateEnvironment { .. } => "create environment".to_string(),
            Self::Activate => "activate".to_string(),
            Self::Install(req) => format!("install {}", req.name),
        }
    }
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Everything the runner needs, decided up front.
#[derive(Debug, Clone)]
pub struct BootstrapPlan {
    layout: EnvLayout,
    steps: Vec<BootstrapStep>,
}

impl BootstrapPlan {
    /// Plan a bootstrap of the environment rooted at `root`.
    ///
    /// The existence check happens here: a present environment yields a
    /// creation step with no invocation.
    pub fn build(root: &Path, config: &EnvstrapConfig, manifest: &Manifest) -> Self {
        let layout = EnvLayout::new(root);

        let invocation = if layout.exists() {
            tracing::debug!(
                "Environment marker {} present, creation not needed",
                layout.scripts_dir().display()
            );
            None
        } else {
            Some(create_invocation(
                config.creator,
                config.python.as_deref(),
                &layout,
            ))
        };

        let mut steps = vec![
            BootstrapStep::CreateEnvironment { invocation },
            BootstrapStep::Activate,
        ];
        steps.extend(
            manifest
                .requirements()
                .iter()
                .cloned()
                .map(BootstrapStep::Install),
        );

        Self { layout, steps }
    }

    /// Environment layout.
    pub fn layout(&self) -> &EnvLayout {
        &self.layout
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[BootstrapStep] {
        &self.steps
    }

    /// Whether the plan will create the environment.
    pub fn creates_environment(&self) -> bool {
        matches!(
            self.steps.first(),
            Some(BootstrapStep::CreateEnvironment {
                invocation: Some(_)
            })
        )
    }
}
