//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`envstrap run`, `envstrap status`)
//! - A bare `envstrap` to mean `envstrap run`
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod run;
pub mod status;

pub use dispatcher::{
    resolve_output_mode, Command, CommandDispatcher, CommandResult, EXIT_CONFIG_ERROR,
};
