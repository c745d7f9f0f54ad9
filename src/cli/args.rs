//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::FailurePolicy;

/// envstrap - Bootstrap a project-local Python virtual environment.
#[derive(Debug, Parser)]
#[command(name = "envstrap")]
#[command(author, version)]
#[command(about = "Bootstrap a project-local Python virtual environment", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .envstrap/config.yml)
    #[arg(short, long, global = true, env = "ENVSTRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, including child process output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the environment and install packages (default if no command specified)
    Run(RunArgs),

    /// Show the environment and package state without changing anything
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Print the planned commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Run every step even after a failure
    #[arg(long, conflicts_with = "fail_fast")]
    pub keep_going: bool,

    /// Stop at the first failed step
    #[arg(long)]
    pub fail_fast: bool,

    /// Plain output, no spinners
    #[arg(long)]
    pub non_interactive: bool,
}

impl RunArgs {
    /// Failure policy requested on the command line, if any.
    pub fn policy(&self) -> Option<FailurePolicy> {
        if self.keep_going {
            Some(FailurePolicy::KeepGoing)
        } else if self.fail_fast {
            Some(FailurePolicy::FailFast)
        } else {
            None
        }
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl Cli {
    /// Whether the invocation asked for plain, non-interactive output.
    pub fn non_interactive(&self) -> bool {
        matches!(&self.command, Some(Commands::Run(args)) if args.non_interactive)
    }
}
