//! Host capability interfaces
//!
//! The Runner never touches the operating system directly. All host
//! mutation goes through two injected interfaces:
//!
//! - `Shell`: runs one command line and reports its exit status
//! - `FileSystem`: writes one file
//!
//! `LocalShell` and `LocalFileSystem` act on the real machine. `DryRunShell`
//! and `DryRunFileSystem` log what would happen and report success. Tests
//! substitute recording doubles.

use crate::error::CommandStatus;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// How a command interacts with the operator's terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// stdin is closed; the command must not prompt.
    None,
    /// stdin is inherited; the Run blocks until the operator finishes.
    Operator,
}

/// Executes shell command lines on the host.
pub trait Shell {
    /// Run `command` to completion and return its status.
    ///
    /// `Err` means the command could not be started at all. A command that
    /// starts and fails is `Ok` with a non-success status.
    fn run(&mut self, command: &str, interaction: Interaction) -> io::Result<CommandStatus>;
}

/// Writes files on the host.
pub trait FileSystem {
    /// Truncate `path` and write `contents` to it.
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()>;
}

// ============================================================================
// Real host
// ============================================================================

/// Runs commands through `sh -c`, like a shell script would.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalShell;

impl Shell for LocalShell {
    fn run(&mut self, command: &str, interaction: Interaction) -> io::Result<CommandStatus> {
        info!("sh -c {:?} interaction={:?}", command, interaction);

        let stdin = match interaction {
            // Non-interactive steps must never block waiting on the terminal
            Interaction::None => Stdio::null(),
            Interaction::Operator => Stdio::inherit(),
        };

        // stdout/stderr stream straight to the operator's terminal
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(stdin)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        let status = CommandStatus::from(status);
        debug!("'{}' finished: {:?}", command, status);
        Ok(status)
    }
}

/// Writes files under a root directory (`/` on a real host).
///
/// Parent directories are not created; the packages that own them are
/// expected to have been installed by earlier steps.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalFileSystem {
    /// Write to absolute paths as given.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }

    /// Rebase every absolute path under `root` (e.g. a scratch directory).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where `path` actually lands.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path.strip_prefix("/").unwrap_or(path))
    }
}

impl FileSystem for LocalFileSystem {
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        let target = self.resolve(path);
        info!("Writing {} ({} bytes)", target.display(), contents.len());
        // Plain truncate-and-write: no backup, no atomic rename
        std::fs::write(&target, contents)
    }
}

// ============================================================================
// Dry run
// ============================================================================

/// Logs commands instead of running them.
#[derive(Debug, Default, Clone)]
pub struct DryRunShell {
    /// Every command line seen, in order.
    pub commands: Vec<String>,
}

impl Shell for DryRunShell {
    fn run(&mut self, command: &str, interaction: Interaction) -> io::Result<CommandStatus> {
        info!("[DRY RUN] Skipped: {} (interaction={:?})", command, interaction);
        self.commands.push(command.to_string());
        Ok(CommandStatus::SUCCESS)
    }
}

/// Logs file writes instead of performing them.
#[derive(Debug, Default, Clone)]
pub struct DryRunFileSystem {
    /// Every path seen, in order.
    pub paths: Vec<PathBuf>,
}

impl FileSystem for DryRunFileSystem {
    fn write_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        info!(
            "[DRY RUN] Skipped write: {} ({} bytes)",
            path.display(),
            contents.len()
        );
        self.paths.push(path.to_path_buf());
        Ok(())
    }
}
