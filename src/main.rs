//! SupportLab - support ticket tracker
//!
//! Entry point for the `supportlab` binary: parses arguments, loads
//! configuration and dispatches to the command handlers.

use clap::Parser;
use std::process;
use supportlab::cli::handlers::{
    handle_init_db_command, handle_report_command, handle_serve_command,
};
use supportlab::cli::{Cli, Commands, OutputFormatter};
use supportlab::config::AppConfig;
use supportlab::error::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,supportlab=debug,sqlx=warn";

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        tracing::debug!(error = ?e, "Command failed");
        formatter.error(&e.to_string());
        process::exit(1);
    }
}

/// Logs go to stderr so that `--json` output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(cli.command.overrides());

    match cli.command {
        Commands::Serve { .. } => {
            config.warn_if_insecure();
            handle_serve_command(config, formatter).await
        },
        Commands::InitDb { .. } => handle_init_db_command(&config, formatter).await,
        Commands::Report { .. } => handle_report_command(&config, formatter).await,
    }
}
