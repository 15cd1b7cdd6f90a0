//! vps-provision - Main entry point
//!
//! Runs the compiled provisioning plan against this host, or previews it.

use anyhow::Context;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vps_provision::cli::{Cli, ListFormat};
use vps_provision::{
    plan, sanity, ConsoleProgress, DryRunFileSystem, DryRunShell, LocalFileSystem, LocalShell,
    ProvisionError, Runner,
};

/// Initialize tracing: stderr, `RUST_LOG` overrides the `info` default
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> ExitCode {
    init_logger();
    info!("vps-provision starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed: {:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Exit status for a failed invocation: a failed command keeps its own code
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ProvisionError>()
        .map(ProvisionError::exit_code)
        .unwrap_or(1)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let steps = plan::vps_plan();

    if cli.list {
        let listing = match cli.format {
            ListFormat::Text => plan::render_text(&steps),
            ListFormat::Json => plan::render_json(&steps)?,
        };
        print!("{}", listing);
        return Ok(());
    }

    if cli.dry_run {
        info!("Dry-run mode: no command will be executed and no file written");
        let mut shell = DryRunShell::default();
        let mut fs = DryRunFileSystem::default();
        Runner::new(&mut shell, &mut fs)
            .with_progress(ConsoleProgress::stdout())
            .run(&steps)?;
        return Ok(());
    }

    if cli.skip_preflight {
        info!("Skipping pre-flight checks");
    } else {
        sanity::run_preflight_checks()?;
    }

    let mut shell = LocalShell;
    let mut fs = LocalFileSystem::new();
    Runner::new(&mut shell, &mut fs)
        .with_progress(ConsoleProgress::stdout())
        .run(&steps)
        .context("Provisioning aborted")?;

    info!("Provisioning finished");
    Ok(())
}
