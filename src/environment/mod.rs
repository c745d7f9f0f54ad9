//! The isolated environment the bootstrap manages.
//!
//! - [`layout`] - Where the environment lives and how presence is detected
//! - [`creator`] - The command that creates it
//! - [`activation`] - Scoped activation applied to child processes

pub mod activation;
pub mod creator;
pub mod layout;

pub use activation::ActivatedEnv;
pub use creator::create_invocation;
pub use layout::{EnvLayout, LayoutReport};
