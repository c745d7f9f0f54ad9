//! Sequential execution of a [`BootstrapPlan`].

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::FailurePolicy;
use crate::environment::ActivatedEnv;
use crate::error::EnvstrapError;
use crate::shell::{CommandOptions, Invocation, ProcessRunner};

use super::plan::{BootstrapPlan, BootstrapStep};

/// Exit code reported when a step's program is not installed.
pub const EXIT_TOOL_NOT_FOUND: i32 = 127;

/// Status of a finished step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step ran and succeeded.
    Completed,
    /// Step ran and failed.
    Failed,
    /// Step did not run.
    Skipped,
    /// Dry run: the step would have run.
    Planned,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
            StepStatus::Planned => "planned",
        };
        write!(f, "{}", s)
    }
}

/// Result of one step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// What happened.
    pub status: StepStatus,

    /// Execution duration.
    pub duration: Duration,

    /// Exit code, if a program ran (127 if it could not be found).
    pub exit_code: Option<i32>,

    /// Command line, if the step runs one.
    pub command: Option<String>,

    /// Program the command line starts with, as it was resolved.
    pub program: Option<PathBuf>,

    /// Why the step failed or was skipped.
    pub detail: Option<String>,

    /// Captured output of a failed command.
    pub output: Option<String>,
}

impl StepResult {
    fn new(name: &str, status: StepStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
            duration: Duration::ZERO,
            exit_code: None,
            command: None,
            program: None,
            detail: None,
            output: None,
        }
    }

    /// A step that did not run.
    pub fn skipped(name: &str, reason: &str) -> Self {
        Self {
            detail: Some(reason.to_string()),
            ..Self::new(name, StepStatus::Skipped)
        }
    }

    /// A step that would run the given command.
    pub fn planned(name: &str, command: Option<String>) -> Self {
        Self {
            command,
            ..Self::new(name, StepStatus::Planned)
        }
    }

    /// Whether the step failed.
    pub fn failed(&self) -> bool {
        self.status == StepStatus::Failed
    }

    /// Process exit code this step contributes (0 unless failed).
    pub fn exit_status(&self) -> i32 {
        if !self.failed() {
            return 0;
        }
        match self.exit_code {
            Some(code) if (1..=255).contains(&code) => code,
            _ => 1,
        }
    }
}

/// Result of a bootstrap run.
#[derive(Debug)]
pub struct BootstrapResult {
    /// One entry per planned step, in order.
    pub steps: Vec<StepResult>,
    /// Total duration.
    pub duration: Duration,
    /// Policy the run used.
    pub policy: FailurePolicy,
    /// Process exit code.
    pub exit_code: i32,
}

impl BootstrapResult {
    /// Whether every step that ran succeeded.
    pub fn success(&self) -> bool {
        !self.steps.iter().any(StepResult::failed)
    }

    /// Names of failed steps.
    pub fn failed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.failed())
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Number of steps that executed a command or activated.
    pub fn steps_run(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Completed | StepStatus::Failed))
            .count()
    }

    /// Number of skipped steps.
    pub fn steps_skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Skipped)
            .count()
    }
}

/// Options for a bootstrap run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Failure policy.
    pub policy: FailurePolicy,
    /// Print the plan, run nothing.
    pub dry_run: bool,
    /// Capture child output instead of passing it through.
    pub capture_output: bool,
    /// `PATH` the activation context builds on.
    pub inherited_path: Option<String>,
}

/// Progress callback for a run.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A step is about to start.
    StepStarting {
        step: &'a BootstrapStep,
        index: usize,
        total: usize,
    },
    /// A step finished (including steps skipped without starting).
    StepFinished { result: &'a StepResult },
}

/// Runs a plan against a [`ProcessRunner`].
pub struct BootstrapRunner<'a, R: ProcessRunner + ?Sized> {
    processes: &'a R,
    plan: &'a BootstrapPlan,
}

impl<'a, R: ProcessRunner + ?Sized> BootstrapRunner<'a, R> {
    /// Create a runner.
    pub fn new(processes: &'a R, plan: &'a BootstrapPlan) -> Self {
        Self { processes, plan }
    }

    /// Run without progress reporting.
    pub fn run(&self, options: &RunOptions) -> BootstrapResult {
        self.run_with_progress(options, |_| {})
    }

    /// Run every step in order, reporting progress.
    ///
    /// Under [`FailurePolicy::FailFast`] the first failure halts the run,
    /// the remaining steps are reported as skipped and the failure's code
    /// becomes the exit code. Under [`FailurePolicy::KeepGoing`] every step
    /// runs and the last step that ran decides the exit code.
    pub fn run_with_progress(
        &self,
        options: &RunOptions,
        mut on_progress: impl FnMut(RunProgress<'_>),
    ) -> BootstrapResult {
        let start = Instant::now();
        let steps = self.plan.steps();
        let total = steps.len();

        let mut results = Vec::with_capacity(total);
        let mut activated: Option<ActivatedEnv> = None;
        let mut halted = false;
        let mut exit_code = 0;

        for (index, step) in steps.iter().enumerate() {
            let name = step.name();

            if halted {
                let result = StepResult::skipped(&name, "earlier step failed");
                on_progress(RunProgress::StepFinished { result: &result });
                results.push(result);
                continue;
            }

            on_progress(RunProgress::StepStarting { step, index, total });

            let result = match step {
                BootstrapStep::CreateEnvironment { invocation: None } => {
                    StepResult::skipped(&name, "environment already present")
                }
                BootstrapStep::CreateEnvironment {
                    invocation: Some(invocation),
                } => self.invoke(&name, invocation, options),
                BootstrapStep::Activate => self.activate(&name, options, &mut activated),
                BootstrapStep::Install(requirement) => {
                    let env = activated.clone().unwrap_or_else(|| self.assumed(options));
                    self.invoke(&name, &env.install(requirement), options)
                }
            };

            if matches!(result.status, StepStatus::Completed | StepStatus::Failed) {
                exit_code = result.exit_status();
            }
            if result.failed() {
                tracing::warn!("Step '{}' failed with exit code {}", name, exit_code);
                if options.policy == FailurePolicy::FailFast {
                    halted = true;
                }
            }

            on_progress(RunProgress::StepFinished { result: &result });
            results.push(result);
        }

        BootstrapResult {
            steps: results,
            duration: start.elapsed(),
            policy: options.policy,
            exit_code,
        }
    }

    fn assumed(&self, options: &RunOptions) -> ActivatedEnv {
        ActivatedEnv::assume(self.plan.layout(), options.inherited_path.as_deref())
    }

    fn activate(
        &self,
        name: &str,
        options: &RunOptions,
        activated: &mut Option<ActivatedEnv>,
    ) -> StepResult {
        if options.dry_run {
            *activated = Some(self.assumed(options));
            return StepResult::planned(name, None);
        }

        let start = Instant::now();
        match ActivatedEnv::activate(self.plan.layout(), options.inherited_path.as_deref()) {
            Ok(env) => {
                tracing::debug!("Activated {}", self.plan.layout().root().display());
                *activated = Some(env);
                StepResult {
                    duration: start.elapsed(),
                    ..StepResult::new(name, StepStatus::Completed)
                }
            }
            Err(e) => StepResult {
                duration: start.elapsed(),
                exit_code: Some(1),
                detail: Some(e.to_string()),
                ..StepResult::new(name, StepStatus::Failed)
            },
        }
    }

    fn invoke(&self, name: &str, invocation: &Invocation, options: &RunOptions) -> StepResult {
        let result = self.spawn(name, invocation, options);
        StepResult {
            program: Some(invocation.program.clone()),
            ..result
        }
    }

    fn spawn(&self, name: &str, invocation: &Invocation, options: &RunOptions) -> StepResult {
        let command = invocation.display();

        if options.dry_run {
            return StepResult::planned(name, Some(command));
        }

        tracing::debug!("Running {}: {}", name, command);
        let cmd_options = CommandOptions {
            capture: options.capture_output,
        };

        let start = Instant::now();
        match self.processes.run(invocation, &cmd_options) {
            Ok(output) if output.success => StepResult {
                duration: output.duration,
                exit_code: output.exit_code,
                command: Some(command),
                ..StepResult::new(name, StepStatus::Completed)
            },
            Ok(output) => {
                let captured = [output.stdout.trim_end(), output.stderr.trim_end()]
                    .iter()
                    .filter(|s| !s.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join("\n");
                StepResult {
                    duration: output.duration,
                    exit_code: output.exit_code,
                    command: Some(command),
                    detail: Some(match output.exit_code {
                        Some(code) => format!("exited with code {}", code),
                        None => "terminated by signal".to_string(),
                    }),
                    output: (!captured.is_empty()).then_some(captured),
                    ..StepResult::new(name, StepStatus::Failed)
                }
            }
            Err(e) => {
                let exit_code = match e {
                    EnvstrapError::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
                    _ => 1,
                };
                StepResult {
                    duration: start.elapsed(),
                    exit_code: Some(exit_code),
                    command: Some(command),
                    detail: Some(e.to_string()),
                    ..StepResult::new(name, StepStatus::Failed)
                }
            }
        }
    }
}
