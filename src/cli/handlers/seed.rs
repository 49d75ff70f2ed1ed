//! Handler for the `seed` command

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::{seed_demo_data, Database};
use std::path::Path;

/// Handler for the `seed` command
///
/// Migrates the database, then seeds the demo accounts and reference data
/// and prints the generated credentials. Accounts that already exist keep
/// their password and are reported as unchanged.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a database
/// write fails.
pub async fn handle_seed_command(
    config_path: Option<&Path>,
    output: &OutputFormatter,
) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let db = Database::connect(&config.database.path).await?;
    db.migrate().await?;

    let seeded = seed_demo_data(&db).await?;
    if output.is_json() {
        output.print_json(&seeded)?;
        return Ok(());
    }

    output.success("Demo data seeded");
    for user in &seeded {
        if user.password.is_empty() {
            output.info(&format!(
                "  {} ({}): already present, password unchanged",
                user.email, user.kind
            ));
        } else {
            output.info(&format!(
                "  {} ({}): password {}",
                user.email, user.kind, user.password
            ));
        }
    }
    Ok(())
}
