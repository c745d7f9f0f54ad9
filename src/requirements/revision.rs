//! Immutable revision pins for version-control sourced packages.

use regex::Regex;
use std::sync::LazyLock;

// Full SHA-1 or SHA-256 object ids. Abbreviations and ref names are mutable
// or ambiguous, so they are refused.
static COMMIT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9a-f]{40}|[0-9a-f]{64})$").unwrap());

/// A full commit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    /// Parse a revision, normalising to lowercase.
    ///
    /// The error is a user-facing message.
    pub fn parse(input: &str) -> std::result::Result<Self, String> {
        let normalized = input.trim().to_ascii_lowercase();
        if COMMIT_ID.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(format!(
                "'{}' is not a full commit id (40 or 64 hex characters); branch and tag names can move",
                input
            ))
        }
    }

    /// The commit id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
