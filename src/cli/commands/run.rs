//! Run command implementation.
//!
//! The `envstrap run` command creates the environment if needed, activates
//! it and installs the package manifest into it.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::{load_config, ConfigSource, EnvstrapConfig};
use crate::error::Result;
use crate::requirements::{Manifest, PackageSource};
use crate::runner::{
    BootstrapPlan, BootstrapRunner, RunOptions, RunProgress, StepResult, StepStatus,
    EXIT_TOOL_NOT_FOUND,
};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::{format_duration, RunSummary, SpinnerHandle, UserInterface};

use super::dispatcher::{Command, CommandResult, EXIT_CONFIG_ERROR};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
    processes: Box<dyn ProcessRunner>,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: None,
            args,
            processes: Box::new(SystemRunner),
        }
    }

    /// Use an explicit configuration file.
    pub fn with_config_path(mut self, path: Option<&Path>) -> Self {
        self.config_path = path.map(Path::to_path_buf);
        self
    }

    /// Run child processes through `processes` instead of the system.
    pub fn with_runner(mut self, processes: Box<dyn ProcessRunner>) -> Self {
        self.processes = processes;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Build run options from args, config and the UI's output mode.
    fn build_options(&self, config: &EnvstrapConfig, ui: &dyn UserInterface) -> RunOptions {
        RunOptions {
            policy: self.args.policy().unwrap_or(config.on_failure),
            dry_run: self.args.dry_run,
            capture_output: !ui.output_mode().shows_command_output(),
            inherited_path: std::env::var("PATH").ok(),
        }
    }

    fn warn_unpinned(&self, manifest: &Manifest, ui: &mut dyn UserInterface) {
        for req in manifest.unpinned() {
            if let PackageSource::Vcs { url, .. } = &req.source {
                tracing::debug!("{} is unpinned, installing latest commit of {}", req.name, url);
                ui.warning(&format!(
                    "{} has no pinned revision; the latest commit of {} will be installed",
                    req.name, url
                ));
                ui.show_hint("Set omni_api.rev to a commit id for reproducible installs");
            }
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // Load configuration
        let config_path = self.config_path.as_deref();
        let (config, source) = match load_config(&self.project_root, config_path) {
            Ok(loaded) => loaded,
            Err(e) if e.is_config_error() => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_CONFIG_ERROR));
            }
            Err(e) => return Err(e),
        };
        let manifest = match Manifest::standard(&config) {
            Ok(m) => m,
            Err(e) if e.is_config_error() => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_CONFIG_ERROR));
            }
            Err(e) => return Err(e),
        };

        ui.show_header(&format!("Bootstrapping {}", self.project_root.display()));

        if self.args.dry_run || ui.output_mode().shows_command_output() {
            match &source {
                ConfigSource::Defaults => ui.message("Config: defaults"),
                other => {
                    if let Some(path) = other.path() {
                        ui.message(&format!("Config: {}", path.display()));
                    }
                }
            }
        }

        if self.args.dry_run {
            ui.message("Running in dry-run mode - no commands will be executed");
        }

        self.warn_unpinned(&manifest, ui);

        let plan = BootstrapPlan::build(&self.project_root, &config, &manifest);
        let options = self.build_options(&config, ui);
        tracing::debug!(
            "Running {} steps with policy {}",
            plan.steps().len(),
            options.policy
        );

        let runner = BootstrapRunner::new(self.processes.as_ref(), &plan);
        let verbose = ui.output_mode().shows_command_output();
        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;
        let mut failures: Vec<StepResult> = Vec::new();

        let result = runner.run_with_progress(&options, |progress| match progress {
            RunProgress::StepStarting { step, index, total } => {
                if verbose {
                    ui.show_progress(index + 1, total);
                    ui.message(&format!("  Running {}...", step));
                } else if !options.dry_run {
                    spinner = Some(ui.start_spinner(&step.name()));
                }
            }
            RunProgress::StepFinished { result } => {
                let label = match result.status {
                    StepStatus::Completed | StepStatus::Failed => {
                        format!("{} ({})", result.name, format_duration(result.duration))
                    }
                    _ => match &result.detail {
                        Some(detail) => format!("{} ({})", result.name, detail),
                        None => result.name.clone(),
                    },
                };

                match (spinner.take(), result.status) {
                    (Some(mut s), StepStatus::Completed) => s.finish_success(&label),
                    (Some(mut s), StepStatus::Failed) => s.finish_error(&label),
                    (Some(mut s), _) => s.finish_skipped(&label),
                    (None, StepStatus::Completed) => ui.success(&format!("  {}", label)),
                    (None, StepStatus::Failed) => ui.error(&format!("  {}", label)),
                    (None, StepStatus::Skipped) => ui.message(&format!("  ○ {}", label)),
                    (None, StepStatus::Planned) => match &result.command {
                        Some(cmd) => ui.message(&format!("  {}: would run `{}`", result.name, cmd)),
                        None => ui.message(&format!(
                            "  {}: would activate {}",
                            result.name,
                            self.project_root.display()
                        )),
                    },
                }

                if result.failed() {
                    failures.push(result.clone());
                }
            }
        });

        for failure in &failures {
            let hint = failure_hint(failure, &config);
            match &failure.command {
                Some(cmd) => ui.show_error_block(
                    cmd,
                    failure.output.as_deref().unwrap_or_default(),
                    hint.as_deref(),
                ),
                None => {
                    if let Some(detail) = &failure.detail {
                        ui.error(detail);
                    }
                    if let Some(h) = &hint {
                        ui.show_hint(h);
                    }
                }
            }
        }

        ui.show_run_summary(&RunSummary::from(&result));

        if self.args.dry_run {
            ui.success("Dry run complete");
            return Ok(CommandResult::success());
        }

        if result.success() {
            let steps_run = result.steps_run();
            let run_label = if steps_run == 1 { "step" } else { "steps" };
            ui.success(&format!(
                "Environment ready ({} {} run, {} skipped)",
                steps_run,
                run_label,
                result.steps_skipped()
            ));
            Ok(CommandResult::success())
        } else {
            ui.error(&format!(
                "Bootstrap failed at: {}",
                result.failed_steps().join(", ")
            ));
            Ok(CommandResult::failure(result.exit_code))
        }
    }
}

/// A next step for the user, based on how a step failed.
fn failure_hint(result: &StepResult, config: &EnvstrapConfig) -> Option<String> {
    if result.exit_code == Some(EXIT_TOOL_NOT_FOUND) {
        let tool = result
            .program
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the tool".to_string());
        return Some(if result.name == "create environment" {
            format!(
                "'{}' is not on PATH. Install it, or set `creator` in .envstrap/config.yml (currently {})",
                tool,
                config.creator.tool_name(config.python.as_deref())
            )
        } else {
            format!("'{}' is missing; the environment may be incomplete", tool)
        });
    }

    match result.name.as_str() {
        "activate" => Some(
            "The environment looks incomplete; remove its scripts directory and run again"
                .to_string(),
        ),
        name if name.starts_with("install ") => {
            Some("Check network access and the package source, then run again".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvstrapError;
    use crate::shell::{CommandOptions, CommandResult as ProcessOutput, Invocation};
    use crate::ui::{MockUI, OutputMode, SpinnerStatus, UiEvent};
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Creator lays out `bin/`; installers exit with `install_code`.
    struct FakeRunner {
        calls: Rc<RefCell<Vec<String>>>,
        install_code: i32,
        creator_missing: bool,
    }

    impl FakeRunner {
        fn new(install_code: i32) -> (Self, Rc<RefCell<Vec<String>>>) {
            let calls = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    calls: Rc::clone(&calls),
                    install_code,
                    creator_missing: false,
                },
                calls,
            )
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, inv: &Invocation, _options: &CommandOptions) -> Result<ProcessOutput> {
            self.calls.borrow_mut().push(inv.display());
            if inv.args.contains(&".".to_string()) {
                if self.creator_missing {
                    return Err(EnvstrapError::ToolNotFound {
                        tool: inv.program.display().to_string(),
                    });
                }
                let bin = inv.cwd.join(crate::shell::scripts_dir_name());
                fs::create_dir_all(&bin).unwrap();
                fs::write(bin.join("activate"), "").unwrap();
                return Ok(ProcessOutput::success(
                    String::new(),
                    String::new(),
                    Duration::ZERO,
                ));
            }
            if self.install_code == 0 {
                Ok(ProcessOutput::success(
                    String::new(),
                    String::new(),
                    Duration::ZERO,
                ))
            } else {
                Ok(ProcessOutput::failure(
                    Some(self.install_code),
                    String::new(),
                    "ERROR: could not install".to_string(),
                    Duration::ZERO,
                ))
            }
        }
    }

    fn write_config(temp: &TempDir, content: &str) {
        let dir = temp.path().join(".envstrap");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }

    #[test]
    fn run_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(temp.path(), RunArgs::default());
        assert_eq!(cmd.project_root(), temp.path());
        assert!(!cmd.args().dry_run);
    }

    #[test]
    fn execute_fresh_project() {
        let temp = TempDir::new().unwrap();
        let (runner, calls) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let calls = calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], "virtualenv .");
        assert!(calls[1].ends_with("install click"));
        assert!(calls[2].contains("git+"));
        assert!(ui.has_success("Environment ready"));
        assert!(ui
            .spinner_outcomes()
            .iter()
            .all(|(status, _)| *status == SpinnerStatus::Success));
    }

    #[test]
    fn verbose_run_reports_header_progress_then_summary() {
        let temp = TempDir::new().unwrap();
        let (runner, _) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        cmd.execute(&mut ui).unwrap();

        let events = ui.events();
        assert!(matches!(&events[0], UiEvent::Header(h) if h.starts_with("Bootstrapping")));
        let progress: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Progress(current, total) => Some((*current, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
        assert!(ui.spinners().is_empty());

        let summary_at = events
            .iter()
            .position(|e| matches!(e, UiEvent::Summary(s) if s.success))
            .unwrap();
        assert_eq!(
            events.last(),
            Some(&UiEvent::Success("Environment ready (4 steps run, 0 skipped)".to_string()))
        );
        assert_eq!(summary_at, events.len() - 2);
    }

    #[test]
    fn execute_warns_when_unpinned() {
        let temp = TempDir::new().unwrap();
        let (runner, _) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_warning("omni_api has no pinned revision"));
    }

    #[test]
    fn execute_pinned_has_no_warning() {
        let temp = TempDir::new().unwrap();
        write_config(
            &temp,
            "omni_api:\n  rev: 0123456789abcdef0123456789abcdef01234567\n",
        );
        let (runner, calls) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.warnings().is_empty());
        assert!(calls.borrow()[2].contains("@0123456789abcdef0123456789abcdef01234567"));
    }

    #[test]
    fn execute_existing_environment_skips_creation() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join(crate::shell::scripts_dir_name());
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("activate"), "").unwrap();

        let (runner, calls) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(calls.borrow().len(), 2);
        assert!(ui.has_success("1 skipped"));
    }

    #[test]
    fn execute_install_failure_passes_exit_code() {
        let temp = TempDir::new().unwrap();
        let (runner, calls) = FakeRunner::new(3);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        // fail_fast: omni_api never runs
        assert_eq!(calls.borrow().len(), 2);
        assert!(ui.has_error("Bootstrap failed at: install click"));
        assert_eq!(ui.error_blocks().len(), 1);
        assert_eq!(ui.error_blocks()[0].1, "ERROR: could not install");
    }

    #[test]
    fn execute_keep_going_runs_every_install() {
        let temp = TempDir::new().unwrap();
        let (runner, calls) = FakeRunner::new(4);
        let args = RunArgs {
            keep_going: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(temp.path(), args).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 4);
        assert_eq!(calls.borrow().len(), 3);
        assert_eq!(ui.error_blocks().len(), 2);
    }

    #[test]
    fn execute_missing_creator_exits_127() {
        let temp = TempDir::new().unwrap();
        let (mut runner, _) = FakeRunner::new(0);
        runner.creator_missing = true;
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, EXIT_TOOL_NOT_FOUND);
        assert!(ui.has_hint("'virtualenv' is not on PATH"));
    }

    #[test]
    fn execute_dry_run_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let (runner, calls) = FakeRunner::new(0);
        let args = RunArgs {
            dry_run: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(temp.path(), args).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(calls.borrow().is_empty());
        assert!(ui.has_message("create environment: would run `virtualenv .`"));
        assert!(ui.has_message("install click: would run"));
        assert!(ui.has_message("Config: defaults"));
        assert!(!temp.path().join("bin").exists());
    }

    #[test]
    fn execute_invalid_config_exits_2() {
        let temp = TempDir::new().unwrap();
        write_config(&temp, "creator: conda\n");
        let (runner, calls) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, EXIT_CONFIG_ERROR);
        assert!(calls.borrow().is_empty());
        assert_eq!(ui.errors().len(), 1);
    }

    #[test]
    fn execute_missing_explicit_config_exits_2() {
        let temp = TempDir::new().unwrap();
        let (runner, _) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default())
            .with_config_path(Some(Path::new("nope.yml")))
            .with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, EXIT_CONFIG_ERROR);
    }

    #[test]
    fn execute_uses_venv_creator_from_config() {
        let temp = TempDir::new().unwrap();
        write_config(&temp, "creator: venv\npython: python3.12\n");
        let (runner, calls) = FakeRunner::new(0);
        let cmd = RunCommand::new(temp.path(), RunArgs::default()).with_runner(Box::new(runner));
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert_eq!(calls.borrow()[0], "python3.12 -m venv .");
    }

    #[test]
    fn missing_tool_hint_names_full_program_path() {
        let mut step = StepResult::skipped("install click", "");
        step.status = StepStatus::Failed;
        step.exit_code = Some(EXIT_TOOL_NOT_FOUND);
        step.command = Some("/home/a b/bin/pip install click".to_string());
        step.program = Some(PathBuf::from("/home/a b/bin/pip"));

        let hint = failure_hint(&step, &EnvstrapConfig::default()).unwrap();

        assert_eq!(hint, "'/home/a b/bin/pip' is missing; the environment may be incomplete");
    }
}
