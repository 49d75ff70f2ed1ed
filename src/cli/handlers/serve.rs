//! Handler for the `serve` command

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::Database;
use crate::web;
use crate::web::AppState;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::info;

/// Handler for the `serve` command
///
/// Loads configuration, applies pending migrations so a fresh database
/// works without a separate `migrate` run, starts the mail queue flusher,
/// and serves HTTP until interrupted.
///
/// # Errors
///
/// Returns an error if startup fails; errors after startup are logged and
/// answered per-request.
pub async fn handle_serve_command(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    output: &OutputFormatter,
) -> Result<()> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let db = Database::connect(&config.database.path).await?;
    db.migrate().await?;

    let state = AppState::new(&db, config.clone())?;
    state.mailer.clone().spawn_flusher();

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    output.success(&format!("Listening on http://{addr}"));
    info!(%addr, database = %config.database.path.display(), "server started");

    axum::serve(listener, web::router(state)).await?;
    Ok(())
}
