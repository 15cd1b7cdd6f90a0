//! vps-provision Library
//!
//! This library provides the provisioning Runner, the compiled step plan
//! and the host capability interfaces it runs against.

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod error;
pub mod host;
pub mod plan;
pub mod progress;
pub mod runner;
pub mod sanity;
pub mod step;

// Re-export main types for convenience
pub use commands::ShellCommand;
pub use error::{CommandStatus, ProvisionError, Result};
pub use host::{
    DryRunFileSystem, DryRunShell, FileSystem, Interaction, LocalFileSystem, LocalShell, Shell,
};
pub use plan::{vps_plan, COMPLETION_MESSAGE};
pub use progress::{ConsoleProgress, NoProgress, ProgressReporter, RunSummary, StepPosition};
pub use runner::Runner;
pub use step::{Phase, Step, StepAction, StepKind};
