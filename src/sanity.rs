//! Pre-flight sanity checks for the provisioning host
//!
//! This module verifies the host before step 0 runs:
//! - Required host binaries are on PATH
//! - Running with root privileges (EUID 0)
//! - The application archive is present (warning only)
//!
//! A failed check aborts before anything on the host has changed.

use crate::artifacts::APP_ARCHIVE;
use crate::error::{ProvisionError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
    pub archive_present: bool,
}

impl SanityCheckResult {
    /// Returns true if all blocking checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.is_root
    }

    /// One-line description of every blocking failure.
    pub fn failure_summary(&self) -> String {
        let mut problems = Vec::new();
        if !self.is_root {
            problems.push("root privileges required".to_string());
        }
        if !self.missing_binaries.is_empty() {
            problems.push(format!(
                "missing required binaries: {}",
                self.missing_binaries.join(", ")
            ));
        }
        problems.join("; ")
    }
}

/// Binaries the plan calls before it installs anything itself
const REQUIRED_BINARIES: &[&str] = &[
    "sh",           // Command execution
    "dnf",          // Package manager
    "systemctl",    // Service manager
    "firewall-cmd", // Firewall manager (firewalld)
    "sysctl",       // Kernel tuning (procps-ng)
    "rm",           // Application directory reset (coreutils)
    "mkdir",
    "chown",
    "chmod",
];

/// Check if a binary is available in PATH
fn binary_exists(name: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {}", name))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Perform all checks and return the result
pub fn verify_environment() -> SanityCheckResult {
    let missing_binaries = REQUIRED_BINARIES
        .iter()
        .filter(|binary| !binary_exists(binary))
        .map(|binary| binary.to_string())
        .collect();

    SanityCheckResult {
        missing_binaries,
        is_root: is_running_as_root(),
        archive_present: Path::new(APP_ARCHIVE).is_file(),
    }
}

/// Print a pretty error message to stderr
pub fn print_report(result: &SanityCheckResult) {
    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════════╗");
    eprintln!("║              vps-provision - Pre-flight Check Failed             ║");
    eprintln!("╚══════════════════════════════════════════════════════════════════╝");
    eprintln!();

    if !result.is_root {
        eprintln!("❌ ERROR: Root privileges required");
        eprintln!("   Provisioning installs packages and writes under /etc.");
        eprintln!();
        eprintln!("   Solution: Run with sudo or as root user:");
        eprintln!("     sudo ./vps-provision");
        eprintln!();
    }

    if !result.missing_binaries.is_empty() {
        eprintln!("❌ ERROR: Missing required binaries");
        eprintln!();
        for binary in &result.missing_binaries {
            eprintln!("   • {} (install: dnf install -y {})", binary, package_for_binary(binary));
        }
        eprintln!();
        eprintln!("   This tool targets Fedora/RHEL-family hosts with firewalld.");
        eprintln!();
    }
}

/// Map binary names to their Fedora/RHEL package names
fn package_for_binary(binary: &str) -> &'static str {
    match binary {
        "sh" => "bash",
        "dnf" => "dnf",
        "systemctl" => "systemd",
        "firewall-cmd" => "firewalld",
        "sysctl" => "procps-ng",
        "rm" | "mkdir" | "chown" | "chmod" => "coreutils",
        _ => "unknown",
    }
}

/// Verify the host and fail if a blocking check does not pass.
pub fn run_preflight_checks() -> Result<()> {
    debug!("Running pre-flight sanity checks...");

    let result = verify_environment();

    if !result.archive_present {
        warn!(
            "Application archive {} not found in the working directory; the extract step will fail",
            APP_ARCHIVE
        );
    }

    if !result.is_ok() {
        print_report(&result);
        return Err(ProvisionError::preflight(result.failure_summary()));
    }

    info!("Pre-flight checks passed: root={}, all binaries present", result.is_root);
    Ok(())
}
