//! Configuration loading, parsing, and validation for envstrap.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! Configuration only tunes tooling (which creator, which interpreter,
//! failure policy, where the VCS dependency lives and which revision to
//! pin). It never changes which packages are installed.
//!
//! # Example
//!
//! ```
//! use envstrap::config::{load_config, FailurePolicy};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".envstrap");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "on_failure: keep_going").unwrap();
//!
//! let (config, _source) = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.on_failure, FailurePolicy::KeepGoing);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    discover, load_config, load_config_file, parse_config, ConfigSource, CONFIG_DIR, CONFIG_FILE,
};
pub use schema::{
    EnvCreator, EnvstrapConfig, FailurePolicy, OutputMode, VcsOverride, DEFAULT_PYTHON,
};
pub use validator::{validate, validate_config, ValidationError};
