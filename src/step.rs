//! Provisioning step model
//!
//! A `Step` is one atomic unit of provisioning work: a shell command, an
//! interactive shell command, or a file write. Steps are immutable once
//! built and carry no state between runs.
//!
//! Steps are grouped into `Phase`s that follow the order of the plan:
//!
//! ```text
//! BaseSystem → Apache → Php → Database → ReverseProxy → AppServer
//!     → Performance → Kernel → Application → Compression → Hardening
//! ```
//!
//! The phase is a label for listings and progress headers; it has no
//! effect on execution.

use crate::commands::ShellCommand;
use serde::Serialize;
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter};

/// Provisioning phases in plan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// System update and basic tools
    BaseSystem,
    /// Apache httpd install
    Apache,
    /// PHP 8.3 runtime and extensions
    Php,
    /// MariaDB server and hardening wizard
    Database,
    /// NGINX in front of Apache
    ReverseProxy,
    /// Apache virtual host on the backend port
    AppServer,
    /// Swappiness and ZRAM
    Performance,
    /// XanMod kernel
    Kernel,
    /// Laravel application bundle
    Application,
    /// Apache mod_deflate
    Compression,
    /// Firewall and Fail2Ban
    Hardening,
}

impl Phase {
    /// Human-readable title for progress headers.
    pub const fn title(self) -> &'static str {
        match self {
            Phase::BaseSystem => "Update the system and install basic tools",
            Phase::Apache => "Install Apache",
            Phase::Php => "Install PHP 8.3 and extensions",
            Phase::Database => "Install MariaDB",
            Phase::ReverseProxy => "Configure NGINX as a reverse proxy",
            Phase::AppServer => "Configure Apache on the backend port",
            Phase::Performance => "Tune swappiness and ZRAM",
            Phase::Kernel => "Install the XanMod kernel",
            Phase::Application => "Deploy the Laravel application",
            Phase::Compression => "Enable gzip compression in Apache",
            Phase::Hardening => "Harden the system",
        }
    }
}

/// Kind of a step, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Command,
    InteractiveCommand,
    FileWrite,
}

/// What a step does when executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepAction {
    /// Run through the host shell with stdin closed.
    Command { command: String },
    /// Run through the host shell with the operator's terminal attached.
    InteractiveCommand { command: String },
    /// Truncate `path` and write `content` verbatim.
    FileWrite { path: PathBuf, content: String },
}

impl StepAction {
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::Command { .. } => StepKind::Command,
            StepAction::InteractiveCommand { .. } => StepKind::InteractiveCommand,
            StepAction::FileWrite { .. } => StepKind::FileWrite,
        }
    }

    /// The command line, for command steps.
    pub fn command(&self) -> Option<&str> {
        match self {
            StepAction::Command { command } | StepAction::InteractiveCommand { command } => {
                Some(command)
            }
            StepAction::FileWrite { .. } => None,
        }
    }

    /// The target path, for file writes.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StepAction::FileWrite { path, .. } => Some(path),
            _ => None,
        }
    }

    /// One-line summary: the command, or the path being written.
    pub fn target(&self) -> String {
        match self {
            StepAction::Command { command } | StepAction::InteractiveCommand { command } => {
                command.clone()
            }
            StepAction::FileWrite { path, .. } => path.display().to_string(),
        }
    }
}

/// One atomic unit of provisioning work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    phase: Phase,
    description: String,
    #[serde(flatten)]
    action: StepAction,
}

impl Step {
    /// A non-interactive shell command.
    pub fn command(phase: Phase, description: impl Into<String>, command: impl ShellCommand) -> Self {
        Self {
            phase,
            description: description.into(),
            action: StepAction::Command {
                command: command.to_command_line(),
            },
        }
    }

    /// A shell command that blocks on operator input.
    pub fn interactive(
        phase: Phase,
        description: impl Into<String>,
        command: impl ShellCommand,
    ) -> Self {
        Self {
            phase,
            description: description.into(),
            action: StepAction::InteractiveCommand {
                command: command.to_command_line(),
            },
        }
    }

    /// Write `content` to `path`, replacing whatever is there.
    pub fn file_write(
        phase: Phase,
        description: impl Into<String>,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            description: description.into(),
            action: StepAction::FileWrite {
                path: path.into(),
                content: content.into(),
            },
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action(&self) -> &StepAction {
        &self.action
    }

    pub fn kind(&self) -> StepKind {
        self.action.kind()
    }
}
