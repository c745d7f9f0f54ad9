//! Bootstrap planning and execution.

pub mod bootstrap;
pub mod plan;

pub use bootstrap::{
    BootstrapResult, BootstrapRunner, RunOptions, RunProgress, StepResult, StepStatus,
    EXIT_TOOL_NOT_FOUND,
};
pub use plan::{BootstrapPlan, BootstrapStep};
