//! The fixed dependency manifest.

use serde::Serialize;

use crate::config::EnvstrapConfig;
use crate::error::{EnvstrapError, Result};

use super::revision::Revision;

/// Published CLI-argument-parsing library.
pub const CLICK: &str = "click";

/// Third-party API client installed from version control.
pub const OMNI_API: &str = "omni_api";

/// Default repository for [`OMNI_API`].
pub const OMNI_API_REPO: &str = "https://github.com/omni-api/omni_api.git";

/// Where a package comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// The installer's default package index.
    Index,
    /// Cloned from a repository, optionally at a fixed revision.
    Vcs { url: String, rev: Option<Revision> },
}

/// A package to install into the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name.
    pub name: String,
    /// Where it is fetched from.
    pub source: PackageSource,
    /// Pass the upgrade flag so a previously installed copy is replaced.
    pub upgrade: bool,
}

impl Requirement {
    /// A package from the default index.
    pub fn index(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: PackageSource::Index,
            upgrade: false,
        }
    }

    /// A package cloned from a repository and installed with `--upgrade`.
    pub fn vcs(name: &str, url: &str, rev: Option<Revision>) -> Self {
        Self {
            name: name.to_string(),
            source: PackageSource::Vcs {
                url: url.to_string(),
                rev,
            },
            upgrade: true,
        }
    }

    /// The argument handed to the installer.
    pub fn install_target(&self) -> String {
        match &self.source {
            PackageSource::Index => self.name.clone(),
            PackageSource::Vcs { url, rev } => match rev {
                Some(rev) => format!("git+{}@{}#egg={}", url, rev, self.name),
                None => format!("git+{}#egg={}", url, self.name),
            },
        }
    }

    /// Installer arguments after the program name.
    pub fn install_args(&self) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        if self.upgrade {
            args.push("--upgrade".to_string());
        }
        args.push(self.install_target());
        args
    }

    /// True for a repository source without a pinned revision.
    pub fn is_unpinned(&self) -> bool {
        matches!(self.source, PackageSource::Vcs { rev: None, .. })
    }
}

/// Serializable view of a requirement for `status --json`.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementView {
    pub name: String,
    pub target: String,
    pub upgrade: bool,
    pub pinned: Option<bool>,
}

impl From<&Requirement> for RequirementView {
    fn from(req: &Requirement) -> Self {
        let pinned = match &req.source {
            PackageSource::Index => None,
            PackageSource::Vcs { rev, .. } => Some(rev.is_some()),
        };
        Self {
            name: req.name.clone(),
            target: req.install_target(),
            upgrade: req.upgrade,
            pinned,
        }
    }
}

/// The ordered list of packages to install.
///
/// Always `click` followed by `omni_api`. Configuration can move or pin
/// the repository but never adds, removes or reorders packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    requirements: Vec<Requirement>,
}

impl Manifest {
    /// Build the manifest for a validated config.
    pub fn standard(config: &EnvstrapConfig) -> Result<Self> {
        let url = config.omni_api.url.as_deref().unwrap_or(OMNI_API_REPO);
        let rev = config
            .omni_api
            .rev
            .as_deref()
            .map(Revision::parse)
            .transpose()
            .map_err(|message| EnvstrapError::ConfigValidationError {
                field: "omni_api.rev".to_string(),
                message,
            })?;

        Ok(Self {
            requirements: vec![Requirement::index(CLICK), Requirement::vcs(OMNI_API, url, rev)],
        })
    }

    /// Requirements in install order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Requirements whose revision can move under us.
    pub fn unpinned(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|r| r.is_unpinned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VcsOverride;

    const SHA1: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn index_requirement_target_is_name() {
        let req = Requirement::index("click");
        assert_eq!(req.install_target(), "click");
        assert_eq!(req.install_args(), vec!["install", "click"]);
        assert!(!req.is_unpinned());
    }

    #[test]
    fn vcs_requirement_upgrades() {
        let req = Requirement::vcs("omni_api", "https://example.com/o.git", None);
        assert_eq!(
            req.install_args(),
            vec!["install", "--upgrade", "git+https://example.com/o.git#egg=omni_api"]
        );
        assert!(req.is_unpinned());
    }

    #[test]
    fn pinned_target_includes_revision() {
        let rev = Revision::parse(SHA1).unwrap();
        let req = Requirement::vcs("omni_api", "https://example.com/o.git", Some(rev));
        assert_eq!(
            req.install_target(),
            format!("git+https://example.com/o.git@{}#egg=omni_api", SHA1)
        );
        assert!(!req.is_unpinned());
    }

    #[test]
    fn standard_manifest_is_fixed() {
        let manifest = Manifest::standard(&EnvstrapConfig::default()).unwrap();
        let names: Vec<_> = manifest.requirements().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![CLICK, OMNI_API]);
        assert_eq!(manifest.unpinned().count(), 1);
    }

    #[test]
    fn config_only_moves_and_pins_repository() {
        let config = EnvstrapConfig {
            omni_api: VcsOverride {
                url: Some("https://mirror.example.com/omni_api.git".to_string()),
                rev: Some(SHA1.to_string()),
            },
            ..Default::default()
        };
        let manifest = Manifest::standard(&config).unwrap();
        assert_eq!(manifest.requirements().len(), 2);
        assert_eq!(manifest.requirements()[0], Requirement::index(CLICK));
        assert!(manifest.requirements()[1]
            .install_target()
            .starts_with("git+https://mirror.example.com/omni_api.git@"));
        assert_eq!(manifest.unpinned().count(), 0);
    }

    #[test]
    fn bad_pin_is_rejected() {
        let config = EnvstrapConfig {
            omni_api: VcsOverride {
                url: None,
                rev: Some("HEAD".to_string()),
            },
            ..Default::default()
        };
        assert!(Manifest::standard(&config).is_err());
    }

    #[test]
    fn view_reports_pin_state() {
        let manifest = Manifest::standard(&EnvstrapConfig::default()).unwrap();
        let views: Vec<RequirementView> = manifest.requirements().iter().map(Into::into).collect();
        assert_eq!(views[0].pinned, None);
        assert_eq!(views[1].pinned, Some(false));
        assert!(views[1].upgrade);
    }
}
