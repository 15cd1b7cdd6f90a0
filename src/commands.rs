//! Type-safe shell command contracts.
//!
//! This module provides the `ShellCommand` trait and the typed builders for
//! every host tool the provisioning plan touches:
//! - `Dnf` for the package manager
//! - `Systemctl` for the service manager
//! - `FirewallCmd` for the firewall manager
//! - `Sysctl` for kernel tuning
//! - `ResetDir`, `Unzip`, `Chown`, `Chmod` for application deployment
//!
//! Each builder renders exactly one literal command line. The Runner never
//! parses these strings; they are handed to the host shell as-is.

/// Trait for anything that renders to a single shell command line.
///
/// # Contract
///
/// - `to_command_line()` returns the command exactly as `sh -c` should receive it.
/// - Rendering is pure: the same value always renders the same string.
pub trait ShellCommand {
    /// Render the literal command line.
    fn to_command_line(&self) -> String;
}

impl ShellCommand for &str {
    fn to_command_line(&self) -> String {
        (*self).to_string()
    }
}

impl ShellCommand for String {
    fn to_command_line(&self) -> String {
        self.clone()
    }
}

// ============================================================================
// Package Manager
// ============================================================================

/// `dnf` invocations. All of them run non-interactively (`-y`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dnf {
    /// `dnf update -y`
    Update,
    /// `dnf install -y <packages...>`
    Install(Vec<String>),
    /// `dnf module enable <stream> -y`
    ModuleEnable(String),
    /// `dnf copr enable -y <repo>`
    CoprEnable(String),
}

impl Dnf {
    /// Install one or more packages.
    pub fn install<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Install(packages.into_iter().map(Into::into).collect())
    }

    /// Enable a module stream such as `php:8.3`.
    pub fn module_enable(stream: impl Into<String>) -> Self {
        Self::ModuleEnable(stream.into())
    }

    /// Enable a COPR repository such as `rmnscnce/kernel-xanmod`.
    pub fn copr_enable(repo: impl Into<String>) -> Self {
        Self::CoprEnable(repo.into())
    }
}

impl ShellCommand for Dnf {
    fn to_command_line(&self) -> String {
        match self {
            Dnf::Update => "dnf update -y".to_string(),
            Dnf::Install(packages) => format!("dnf install -y {}", packages.join(" ")),
            // -y trails the stream name here
            Dnf::ModuleEnable(stream) => format!("dnf module enable {} -y", stream),
            Dnf::CoprEnable(repo) => format!("dnf copr enable -y {}", repo),
        }
    }
}

// ============================================================================
// Service Manager
// ============================================================================

/// `systemctl` invocations against a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Systemctl {
    /// `systemctl enable --now <unit>`
    EnableNow(String),
    /// `systemctl restart <unit>`
    Restart(String),
}

impl Systemctl {
    /// Enable a unit at boot and start it immediately.
    pub fn enable_now(unit: impl Into<String>) -> Self {
        Self::EnableNow(unit.into())
    }

    /// Restart a unit.
    pub fn restart(unit: impl Into<String>) -> Self {
        Self::Restart(unit.into())
    }
}

impl ShellCommand for Systemctl {
    fn to_command_line(&self) -> String {
        match self {
            Systemctl::EnableNow(unit) => format!("systemctl enable --now {}", unit),
            Systemctl::Restart(unit) => format!("systemctl restart {}", unit),
        }
    }
}

// ============================================================================
// Firewall Manager
// ============================================================================

/// `firewall-cmd` invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirewallCmd {
    /// `firewall-cmd [--permanent] --add-service=<svc>...`
    AddServices { permanent: bool, services: Vec<String> },
    /// `firewall-cmd --reload`
    Reload,
}

impl FirewallCmd {
    /// Permanently allow the given firewalld services.
    pub fn allow_permanent<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AddServices {
            permanent: true,
            services: services.into_iter().map(Into::into).collect(),
        }
    }
}

impl ShellCommand for FirewallCmd {
    fn to_command_line(&self) -> String {
        match self {
            FirewallCmd::AddServices {
                permanent,
                services,
            } => {
                let mut parts = vec!["firewall-cmd".to_string()];
                if *permanent {
                    parts.push("--permanent".to_string());
                }
                parts.extend(services.iter().map(|s| format!("--add-service={}", s)));
                parts.join(" ")
            }
            FirewallCmd::Reload => "firewall-cmd --reload".to_string(),
        }
    }
}

// ============================================================================
// Kernel Tuning
// ============================================================================

/// `sysctl <key>=<value>`, applied to the running kernel only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sysctl {
    pub key: String,
    pub value: String,
}

impl Sysctl {
    pub fn set(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl ShellCommand for Sysctl {
    fn to_command_line(&self) -> String {
        format!("sysctl {}={}", self.key, self.value)
    }
}

// ============================================================================
// Application Deployment
// ============================================================================

/// Wipe a directory and recreate it empty.
///
/// Destructive: anything under `path` is lost, even on a re-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetDir {
    pub path: String,
}

impl ShellCommand for ResetDir {
    fn to_command_line(&self) -> String {
        format!("rm -rf {0} && mkdir -p {0}", self.path)
    }
}

/// `unzip <archive> -d <destination>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unzip {
    pub archive: String,
    pub destination: String,
}

impl ShellCommand for Unzip {
    fn to_command_line(&self) -> String {
        format!("unzip {} -d {}", self.archive, self.destination)
    }
}

/// `chown [-R] <owner>:<group> <path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chown {
    pub owner: String,
    pub group: String,
    pub path: String,
    pub recursive: bool,
}

impl ShellCommand for Chown {
    fn to_command_line(&self) -> String {
        let flag = if self.recursive { " -R" } else { "" };
        format!("chown{} {}:{} {}", flag, self.owner, self.group, self.path)
    }
}

/// `chmod [-R] <mode> <paths...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chmod {
    pub mode: String,
    pub paths: Vec<String>,
    pub recursive: bool,
}

impl ShellCommand for Chmod {
    fn to_command_line(&self) -> String {
        let flag = if self.recursive { " -R" } else { "" };
        format!("chmod{} {} {}", flag, self.mode, self.paths.join(" "))
    }
}
