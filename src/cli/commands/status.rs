//! Status command implementation.
//!
//! The `envstrap status` command reports what a run would find, without
//! creating or installing anything.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::config::{load_config, FailurePolicy};
use crate::environment::{EnvLayout, LayoutReport};
use crate::error::Result;
use crate::requirements::{Manifest, RequirementView};
use crate::shell::find_tool;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, EXIT_CONFIG_ERROR};

/// Creator tool lookup.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorReport {
    pub tool: String,
    pub path: Option<PathBuf>,
}

/// Everything `status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub config: Option<PathBuf>,
    pub environment: LayoutReport,
    pub creator: CreatorReport,
    pub on_failure: FailurePolicy,
    pub requirements: Vec<RequirementView>,
}

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project_root: &Path, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: None,
            args,
        }
    }

    /// Use an explicit configuration file.
    pub fn with_config_path(mut self, path: Option<&Path>) -> Self {
        self.config_path = path.map(Path::to_path_buf);
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }

    /// Collect the report.
    pub fn report(&self) -> Result<StatusReport> {
        let (config, source) = load_config(&self.project_root, self.config_path.as_deref())?;
        let manifest = Manifest::standard(&config)?;
        let tool = config.creator.tool_name(config.python.as_deref());

        Ok(StatusReport {
            config: source.path().map(Path::to_path_buf),
            environment: EnvLayout::new(&self.project_root).inspect(),
            creator: CreatorReport {
                path: find_tool(&tool),
                tool,
            },
            on_failure: config.on_failure,
            requirements: manifest.requirements().iter().map(Into::into).collect(),
        })
    }

    fn show(&self, report: &StatusReport, ui: &mut dyn UserInterface) {
        ui.show_header(&format!("{} - Status", report.environment.root.display()));

        match &report.config {
            Some(path) => ui.message(&format!("Config: {}", path.display())),
            None => ui.message("Config: defaults"),
        }
        ui.message(&format!("Failure policy: {}", report.on_failure));
        ui.message("");

        let env = &report.environment;
        if env.exists {
            ui.success(&format!("Environment: {}", env.scripts_dir.display()));
            if !env.activate_script {
                ui.warning("Activation script missing; the environment looks incomplete");
            }
            if !env.installer {
                ui.warning("Installer missing from the environment");
            }
        } else {
            ui.message(&format!(
                "Environment: not created ({} missing)",
                env.scripts_dir.display()
            ));
        }

        match &report.creator.path {
            Some(path) => ui.success(&format!(
                "Creator: {} ({})",
                report.creator.tool,
                path.display()
            )),
            None if env.exists => ui.message(&format!(
                "Creator: {} not on PATH (not needed)",
                report.creator.tool
            )),
            None => {
                ui.warning(&format!("Creator: {} not on PATH", report.creator.tool));
                ui.show_hint("Install it, or set `creator` in .envstrap/config.yml");
            }
        }

        ui.message("");
        ui.message("Packages:");
        for req in &report.requirements {
            let pin = match req.pinned {
                Some(true) => " (pinned)",
                Some(false) => " (unpinned)",
                None => "",
            };
            ui.message(&format!("  {} <- {}{}", req.name, req.target, pin));
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = match self.report() {
            Ok(r) => r,
            Err(e) if e.is_config_error() => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_CONFIG_ERROR));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            println!("{}", json);
        } else {
            self.show(&report, ui);
        }

        Ok(CommandResult::success())
    }
}
