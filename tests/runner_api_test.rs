//! Integration tests for the runner public API.

use envstrap::config::{EnvstrapConfig, FailurePolicy};
use envstrap::requirements::Manifest;
use envstrap::runner::{
    BootstrapPlan, BootstrapRunner, RunOptions, RunProgress, StepStatus, EXIT_TOOL_NOT_FOUND,
};
use envstrap::shell::{CommandOptions, CommandResult, Invocation, ProcessRunner};
use envstrap::{EnvstrapError, Result};
use std::cell::RefCell;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// Answers every call with `code`; the creator call lays out the
/// environment first.
struct ScriptedRunner {
    code: i32,
    seen: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    fn new(code: i32) -> Self {
        Self {
            code,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation, _options: &CommandOptions) -> Result<CommandResult> {
        self.seen.borrow_mut().push(invocation.clone());
        if invocation.program.ends_with("virtualenv") {
            let scripts = invocation.cwd.join(envstrap::shell::scripts_dir_name());
            fs::create_dir_all(&scripts)?;
            fs::write(scripts.join("activate"), "")?;
            return Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ));
        }
        if self.code == 0 {
            Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ))
        } else {
            Ok(CommandResult::failure(
                Some(self.code),
                String::new(),
                String::new(),
                Duration::ZERO,
            ))
        }
    }
}

/// Nothing is installed on this machine.
struct NothingInstalled;

impl ProcessRunner for NothingInstalled {
    fn run(&self, invocation: &Invocation, _options: &CommandOptions) -> Result<CommandResult> {
        Err(EnvstrapError::ToolNotFound {
            tool: invocation.program.display().to_string(),
        })
    }
}

fn plan_for(temp: &TempDir) -> BootstrapPlan {
    let config = EnvstrapConfig::default();
    let manifest = Manifest::standard(&config).unwrap();
    BootstrapPlan::build(temp.path(), &config, &manifest)
}

#[test]
fn full_bootstrap_in_order() {
    let temp = TempDir::new().unwrap();
    let plan = plan_for(&temp);
    let processes = ScriptedRunner::new(0);

    let result = BootstrapRunner::new(&processes, &plan).run(&RunOptions::default());

    assert!(result.success());
    assert_eq!(result.exit_code, 0);
    let seen = processes.seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].args, vec!["."]);
    assert_eq!(seen[1].args, vec!["install", "click"]);
    assert_eq!(seen[2].args[..2], ["install", "--upgrade"]);
    assert!(seen[1].env.contains_key("VIRTUAL_ENV"));
    assert!(seen[2].env_remove.contains(&"PYTHONHOME".to_string()));
}

#[test]
fn replanning_after_creation_skips_it() {
    let temp = TempDir::new().unwrap();
    let processes = ScriptedRunner::new(0);
    BootstrapRunner::new(&processes, &plan_for(&temp)).run(&RunOptions::default());

    let second = plan_for(&temp);
    assert!(!second.creates_environment());
    let result = BootstrapRunner::new(&processes, &second).run(&RunOptions::default());

    assert_eq!(result.steps[0].status, StepStatus::Skipped);
    assert_eq!(processes.seen.borrow().len(), 5);
}

#[test]
fn keep_going_reports_last_exit_code() {
    let temp = TempDir::new().unwrap();
    let plan = plan_for(&temp);
    let processes = ScriptedRunner::new(9);
    let options = RunOptions {
        policy: FailurePolicy::KeepGoing,
        ..Default::default()
    };

    let result = BootstrapRunner::new(&processes, &plan).run(&options);

    assert_eq!(result.exit_code, 9);
    assert_eq!(result.failed_steps(), vec!["install click", "install omni_api"]);
}

#[test]
fn missing_tools_map_to_127() {
    let temp = TempDir::new().unwrap();
    let plan = plan_for(&temp);

    let result = BootstrapRunner::new(&NothingInstalled, &plan).run(&RunOptions::default());

    assert_eq!(result.exit_code, EXIT_TOOL_NOT_FOUND);
    assert_eq!(result.steps_skipped(), 3);
}

#[test]
fn progress_events_bracket_each_step() {
    let temp = TempDir::new().unwrap();
    let plan = plan_for(&temp);
    let processes = ScriptedRunner::new(0);
    let mut events = Vec::new();

    BootstrapRunner::new(&processes, &plan).run_with_progress(&RunOptions::default(), |p| {
        match p {
            RunProgress::StepStarting { step, index, total } => {
                events.push(format!("start {} {}/{}", step, index + 1, total))
            }
            RunProgress::StepFinished { result } => {
                events.push(format!("finish {} {}", result.name, result.status))
            }
        }
    });

    assert_eq!(
        events,
        vec![
            "start create environment 1/4",
            "finish create environment completed",
            "start activate 2/4",
            "finish activate completed",
            "start install click 3/4",
            "finish install click completed",
            "start install omni_api 4/4",
            "finish install omni_api completed",
        ]
    );
}
