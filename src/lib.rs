//! envstrap - Bootstrap a project-local Python virtual environment.
//!
//! envstrap makes the project directory itself an isolated Python
//! environment (if it is not one already), activates it for its own child
//! processes, and installs a fixed set of packages into it.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Optional configuration loading and validation
//! - [`environment`] - Environment layout, creation and activation
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - The package manifest and revision pins
//! - [`runner`] - Bootstrap planning and sequential execution
//! - [`shell`] - Child process execution and platform helpers
//! - [`ui`] - Spinners, summaries and terminal output
//!
//! # Example
//!
//! ```
//! use envstrap::config::EnvstrapConfig;
//! use envstrap::requirements::Manifest;
//! use envstrap::runner::{BootstrapPlan, BootstrapStep};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = EnvstrapConfig::default();
//! let manifest = Manifest::standard(&config).unwrap();
//! let plan = BootstrapPlan::build(dir.path(), &config, &manifest);
//!
//! let names: Vec<String> = plan.steps().iter().map(BootstrapStep::name).collect();
//! assert_eq!(
//!     names,
//!     ["create environment", "activate", "install click", "install omni_api"]
//! );
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{EnvstrapError, Result};
