//! helpdesk - support ticket service
//!
//! This is the main entry point for the helpdesk binary. It parses
//! command-line arguments, sets up logging, and dispatches to the
//! appropriate command handler.

use clap::Parser;
use helpdesk::cli::{handlers, Cli, Commands, OutputFormatter};
use helpdesk::error::Result;
use std::process;
use tracing_subscriber::EnvFilter;

/// Main entry point for the helpdesk binary
///
/// Parses command-line arguments and executes the requested command.
/// Errors are printed in their user-facing form; the full chain is shown
/// when debug logging is active.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    init_tracing(cli.verbose);

    if let Err(e) = run(cli, &formatter).await {
        formatter.error(&e.user_message());
        if tracing::enabled!(tracing::Level::DEBUG) {
            eprintln!("\nDebug information:");
            eprintln!("{e:?}");
        }
        process::exit(1);
    }
}

/// Set up the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug level for
/// the crate and the HTTP trace layer.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "helpdesk=debug,tower_http=debug"
    } else {
        "helpdesk=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Dispatch to the handler for the parsed command
async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Migrate => handlers::handle_migrate_command(config_path, formatter).await,
        Commands::Seed => handlers::handle_seed_command(config_path, formatter).await,
        Commands::Serve { host, port } => {
            handlers::handle_serve_command(config_path, host, port, formatter).await
        }
    }
}
