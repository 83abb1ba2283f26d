//! Handlers for the `init-db` and `report` commands

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::{SqliteStore, open_store};

/// Create the ticket table in the configured database
///
/// Running it against an existing database leaves its tickets untouched.
pub async fn handle_init_db_command(config: &AppConfig, output: &OutputFormatter) -> Result<()> {
    let store = SqliteStore::new(&config.database_path);
    store.init_schema().await?;

    let path = store.path().display().to_string();
    tracing::info!(%path, "Database initialized");

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "success",
            "database": path,
        }))?;
    } else {
        output.success(&format!("Database ready at {path}"));
    }
    Ok(())
}

/// Print ticket statistics
pub async fn handle_report_command(config: &AppConfig, output: &OutputFormatter) -> Result<()> {
    let store = open_store(config).await?;
    let stats = store.aggregate_counts().await?;

    if output.is_json() {
        output.print_json(&stats)?;
    } else {
        output.print_report(&stats);
    }
    Ok(())
}
