//! On-disk shape of the isolated environment.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::shell::{executable_name, scripts_dir_name};

/// Where the environment lives.
///
/// The environment root is the project directory itself, so the
/// executables directory (`bin`, or `Scripts` on Windows) sits directly
/// under the project. That directory doubles as the "already created"
/// marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    root: PathBuf,
    scripts: PathBuf,
}

impl EnvLayout {
    /// Layout for an environment rooted at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            scripts: root.join(scripts_dir_name()),
        }
    }

    /// Environment root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts
    }

    /// Whether the environment has already been created.
    pub fn exists(&self) -> bool {
        self.scripts.is_dir()
    }

    /// The activation entry point.
    pub fn activate_script(&self) -> PathBuf {
        self.scripts.join("activate")
    }

    /// Path of an executable inside the environment.
    pub fn executable(&self, stem: &str) -> PathBuf {
        self.scripts.join(executable_name(stem))
    }

    /// The environment's package installer.
    pub fn installer(&self) -> PathBuf {
        self.executable("pip")
    }

    /// Snapshot of the layout on disk.
    pub fn inspect(&self) -> LayoutReport {
        LayoutReport {
            root: self.root.clone(),
            scripts_dir: self.scripts.clone(),
            exists: self.exists(),
            activate_script: self.activate_script().is_file(),
            installer: self.installer().is_file(),
        }
    }
}

/// What was found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    pub root: PathBuf,
    pub scripts_dir: PathBuf,
    pub exists: bool,
    pub activate_script: bool,
    pub installer: bool,
}
