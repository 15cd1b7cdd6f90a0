//! The compiled provisioning plan.
//!
//! `vps_plan()` returns the full ordered step list for a Laravel host:
//! Apache on the backend port behind NGINX, PHP 8.3, MariaDB, ZRAM,
//! the XanMod kernel, firewalld and Fail2Ban.
//!
//! Order is part of the contract. The NGINX site is written only after
//! NGINX is installed, and Apache is restarted after each change to its
//! configuration directory.

use crate::artifacts::{
    APP_ARCHIVE, APP_OWNER, APP_ROOT, APP_WRITABLE_DIRS, HTTPD_GZIP_CONF, HTTPD_GZIP_PATH,
    HTTPD_VHOST_CONF, HTTPD_VHOST_PATH, NGINX_SITE_CONF, NGINX_SITE_PATH, SWAPPINESS,
    SWAPPINESS_CONF, SWAPPINESS_PATH, ZRAM_GENERATOR_CONF, ZRAM_GENERATOR_PATH,
};
use crate::commands::{Chmod, Chown, Dnf, FirewallCmd, ResetDir, Sysctl, Systemctl, Unzip};
use crate::error::Result;
use crate::step::{Phase, Step};
use std::fmt::Write;

/// Message shown once every step has completed.
pub const COMPLETION_MESSAGE: &str =
    "VPS setup completed! Your Laravel application should now be available.";

const PHP_PACKAGES: &[&str] = &[
    "php",
    "php-cli",
    "php-mysqlnd",
    "php-xml",
    "php-mbstring",
    "php-curl",
    "php-zip",
    "php-bcmath",
];

/// Build the full provisioning plan.
///
/// The list is rebuilt on every call and never depends on host state, so
/// two calls always return equal plans.
pub fn vps_plan() -> Vec<Step> {
    vec![
        // Base system
        Step::command(Phase::BaseSystem, "Updating system packages...", Dnf::Update),
        Step::command(
            Phase::BaseSystem,
            "Installing basic utilities...",
            Dnf::install(["epel-release", "wget", "curl", "unzip", "nano"]),
        ),
        // Apache
        Step::command(Phase::Apache, "Installing Apache...", Dnf::install(["httpd"])),
        Step::command(
            Phase::Apache,
            "Enabling and starting Apache...",
            Systemctl::enable_now("httpd"),
        ),
        // PHP
        Step::command(
            Phase::Php,
            "Enabling PHP 8.3 module...",
            Dnf::module_enable("php:8.3"),
        ),
        Step::command(
            Phase::Php,
            "Installing PHP 8.3...",
            Dnf::install(PHP_PACKAGES.iter().copied()),
        ),
        // Database
        Step::command(
            Phase::Database,
            "Installing MariaDB server...",
            Dnf::install(["mariadb-server"]),
        ),
        Step::command(
            Phase::Database,
            "Starting and enabling MariaDB...",
            Systemctl::enable_now("mariadb"),
        ),
        Step::interactive(
            Phase::Database,
            "Running MySQL secure installation wizard...",
            "mysql_secure_installation",
        ),
        // Reverse proxy
        Step::command(Phase::ReverseProxy, "Installing NGINX...", Dnf::install(["nginx"])),
        Step::file_write(
            Phase::ReverseProxy,
            "Writing NGINX reverse proxy config...",
            NGINX_SITE_PATH,
            NGINX_SITE_CONF,
        ),
        Step::command(
            Phase::ReverseProxy,
            "Starting and enabling NGINX...",
            Systemctl::enable_now("nginx"),
        ),
        // Apache behind the proxy
        Step::file_write(
            Phase::AppServer,
            "Writing Apache virtual host on port 8080...",
            HTTPD_VHOST_PATH,
            HTTPD_VHOST_CONF,
        ),
        Step::command(
            Phase::AppServer,
            "Restarting Apache to apply changes...",
            Systemctl::restart("httpd"),
        ),
        // Performance
        Step::command(
            Phase::Performance,
            "Tuning swappiness to 10...",
            Sysctl::set("vm.swappiness", SWAPPINESS),
        ),
        Step::file_write(
            Phase::Performance,
            "Persisting swappiness setting...",
            SWAPPINESS_PATH,
            SWAPPINESS_CONF,
        ),
        Step::command(
            Phase::Performance,
            "Installing ZRAM generator...",
            Dnf::install(["zram-generator-defaults"]),
        ),
        Step::file_write(
            Phase::Performance,
            "Writing ZRAM generator config...",
            ZRAM_GENERATOR_PATH,
            ZRAM_GENERATOR_CONF,
        ),
        Step::command(
            Phase::Performance,
            "Configuring ZRAM...",
            Systemctl::restart("systemd-zram-setup@zram0"),
        ),
        // Kernel
        Step::command(
            Phase::Kernel,
            "Adding XanMod kernel repository...",
            Dnf::copr_enable("rmnscnce/kernel-xanmod"),
        ),
        Step::command(
            Phase::Kernel,
            "Installing XanMod kernel...",
            Dnf::install(["kernel-xanmod"]),
        ),
        // Application
        Step::command(
            Phase::Application,
            "Preparing Laravel directory...",
            ResetDir {
                path: APP_ROOT.to_string(),
            },
        ),
        Step::command(
            Phase::Application,
            "Installing unzip tool...",
            Dnf::install(["unzip"]),
        ),
        Step::command(
            Phase::Application,
            "Extracting Laravel application...",
            Unzip {
                archive: APP_ARCHIVE.to_string(),
                destination: APP_ROOT.to_string(),
            },
        ),
        Step::command(
            Phase::Application,
            "Setting permissions for Laravel app...",
            Chown {
                owner: APP_OWNER.to_string(),
                group: APP_OWNER.to_string(),
                path: APP_ROOT.to_string(),
                recursive: true,
            },
        ),
        Step::command(
            Phase::Application,
            "Setting file permissions...",
            Chmod {
                mode: "775".to_string(),
                paths: APP_WRITABLE_DIRS.iter().map(|d| d.to_string()).collect(),
                recursive: true,
            },
        ),
        // Compression
        Step::file_write(
            Phase::Compression,
            "Writing Apache gzip config...",
            HTTPD_GZIP_PATH,
            HTTPD_GZIP_CONF,
        ),
        Step::command(
            Phase::Compression,
            "Restarting Apache to enable Gzip...",
            Systemctl::restart("httpd"),
        ),
        // Hardening
        Step::command(
            Phase::Hardening,
            "Configuring firewall for HTTP/HTTPS...",
            FirewallCmd::allow_permanent(["http", "https"]),
        ),
        Step::command(Phase::Hardening, "Reloading firewall...", FirewallCmd::Reload),
        Step::command(
            Phase::Hardening,
            "Installing Fail2Ban...",
            Dnf::install(["fail2ban"]),
        ),
        Step::command(
            Phase::Hardening,
            "Enabling Fail2Ban...",
            Systemctl::enable_now("fail2ban"),
        ),
    ]
}

/// Render a plan as a numbered table: index, phase, kind, description, target.
pub fn render_text(steps: &[Step]) -> String {
    let mut out = String::new();
    for (index, step) in steps.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{:>3}  {:<14} {:<20} {:<46} {}",
            index,
            step.phase().to_string(),
            step.kind().to_string(),
            step.description(),
            step.action().target()
        );
    }
    out
}

/// Render a plan as a pretty-printed JSON array.
pub fn render_json(steps: &[Step]) -> Result<String> {
    Ok(serde_json::to_string_pretty(steps)?)
}
