//! Error handling module for vps-provision
//!
//! Provides the error taxonomy of a provisioning Run using thiserror.
//! Every error is fatal: the Runner returns the first one it sees and the
//! binary maps it to a process exit code.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Outcome of one shell invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code (None if terminated by signal).
    pub code: Option<i32>,
    /// Terminating signal, if any.
    pub signal: Option<i32>,
}

impl CommandStatus {
    /// A successful exit (code 0).
    pub const SUCCESS: CommandStatus = CommandStatus {
        code: Some(0),
        signal: None,
    };

    /// Status for a process that exited normally with `code`.
    pub const fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    /// Status for a process killed by `signal`.
    pub const fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        Self {
            code: status.code(),
            signal: status.signal(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "returned non-zero exit status {}", code),
            (None, Some(signal)) => write!(f, "was terminated by signal {}", signal),
            (None, None) => write!(f, "exited with an unknown status"),
        }
    }
}

/// Main error type for a provisioning Run
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// A command step exited non-zero or was killed
    #[error("step {step} ({description}): command '{command}' {status}")]
    CommandFailed {
        step: usize,
        description: String,
        command: String,
        status: CommandStatus,
    },

    /// The host shell could not be launched at all
    #[error("step {step} ({description}): failed to launch '{command}': {source}")]
    Spawn {
        step: usize,
        description: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A file write step failed; the target may be left partially written
    #[error("step {step} ({description}): failed to write {}: {source}", .path.display())]
    FileWrite {
        step: usize,
        description: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Environment verification failed before the Run started
    #[error("Pre-flight check failed: {0}")]
    Preflight(String),

    /// JSON serialization errors (plan listing)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Create a pre-flight error
    pub fn preflight(msg: impl Into<String>) -> Self {
        Self::Preflight(msg.into())
    }

    /// Index of the step that failed, if the error came from the Runner.
    pub fn step(&self) -> Option<usize> {
        match self {
            Self::CommandFailed { step, .. }
            | Self::Spawn { step, .. }
            | Self::FileWrite { step, .. } => Some(*step),
            Self::Preflight(_) | Self::Json(_) => None,
        }
    }

    /// Process exit code for this error.
    ///
    /// A failed command propagates its own non-zero exit code, a signal maps
    /// to `128 + signal` like a shell would, everything else is `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CommandFailed { status, .. } => match (status.code, status.signal) {
                (Some(code), _) if (1..=255).contains(&code) => code as u8,
                (None, Some(signal)) if (1..=127).contains(&signal) => 128 + signal as u8,
                _ => 1,
            },
            _ => 1,
        }
    }
}
