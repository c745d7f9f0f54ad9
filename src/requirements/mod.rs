//! Packages installed into the environment.
//!
//! # Modules
//!
//! - [`package`] - The fixed manifest and how each entry is handed to the installer
//! - [`revision`] - Immutable revision pins for repository sources

pub mod package;
pub mod revision;

pub use package::{
    Manifest, PackageSource, Requirement, RequirementView, CLICK, OMNI_API, OMNI_API_REPO,
};
pub use revision::Revision;
