mod cli;
mod commands;
mod error;
mod host;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use castr_core::SyncConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need account credentials
        Command::Config(ref args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let config = build_sync_config(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, config, &cli.global).await
        }
    }
}

/// Build a `SyncConfig` from the config file, environment, and CLI overrides.
fn build_sync_config(global: &GlobalOpts) -> Result<SyncConfig, CliError> {
    let cfg = castr_config::load_config(global.config.as_deref())?;
    let mut config = castr_config::to_sync_config(&cfg)?;

    if let Some(interval) = global.interval {
        config.poll_interval_secs = interval;
        config.validate()?;
    }
    Ok(config)
}
