use clap::{Parser, ValueEnum};

/// vps-provision - set up a VPS to host a Laravel application
///
/// With no arguments, runs the full provisioning plan against this host.
#[derive(Parser, Debug)]
#[command(name = "vps-provision")]
#[command(about = "Provision a Fedora/RHEL VPS: Apache + PHP 8.3 + MariaDB behind NGINX")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: log every step instead of executing it.
    ///
    /// No command is run and no file is written. Pre-flight checks are
    /// skipped so the plan can be previewed on any machine.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the provisioning plan and exit without running it.
    #[arg(long)]
    pub list: bool,

    /// Output format for --list.
    #[arg(long, value_enum, default_value_t = ListFormat::Text, requires = "list")]
    pub format: ListFormat,

    /// Skip the root and required-binary checks.
    #[arg(long)]
    pub skip_preflight: bool,
}

/// Plan listing format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
