//! Child process execution and platform details.

pub mod command;
pub mod platform;

pub use command::{
    execute, CommandOptions, CommandResult, Invocation, ProcessRunner, SystemRunner,
};
pub use platform::{executable_name, find_tool, is_ci, path_separator, scripts_dir_name};
