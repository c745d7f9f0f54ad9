//! Environment creation commands.

use crate::config::{EnvCreator, DEFAULT_PYTHON};
use crate::shell::Invocation;

use super::layout::EnvLayout;

/// The command that creates an environment rooted at `layout`.
///
/// The creator runs inside the root and targets `.`, so the environment
/// is laid out directly in the project directory.
pub fn create_invocation(
    creator: EnvCreator,
    python: Option<&str>,
    layout: &EnvLayout,
) -> Invocation {
    match creator {
        EnvCreator::Virtualenv => {
            let mut inv = Invocation::new("virtualenv", layout.root());
            if let Some(python) = python {
                inv = inv.args(["-p", python]);
            }
            inv.arg(".")
        }
        EnvCreator::Venv => Invocation::new(python.unwrap_or(DEFAULT_PYTHON), layout.root())
            .args(["-m", "venv", "."]),
    }
}
