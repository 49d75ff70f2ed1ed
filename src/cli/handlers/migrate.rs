//! Handler for the `migrate` command

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::Database;
use std::path::Path;

/// Handler for the `migrate` command
///
/// Connects to the configured database, creating the file if it does not
/// exist, and applies any pending migrations.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a migration
/// fails to apply.
pub async fn handle_migrate_command(
    config_path: Option<&Path>,
    output: &OutputFormatter,
) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let db = Database::connect(&config.database.path).await?;
    db.migrate().await?;

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "ok",
            "database": config.database.path,
        }))?;
    } else {
        output.success(&format!(
            "Database ready at {}",
            config.database.path.display()
        ));
    }
    Ok(())
}
