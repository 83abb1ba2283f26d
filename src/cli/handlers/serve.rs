//! Handler for the `serve` command

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::open_store;
use crate::web::{AppState, build_router};

/// Run the web application until Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be opened or its schema created
/// - Custom templates fail to load
/// - The listen address is invalid or already in use
pub async fn handle_serve_command(config: AppConfig, output: &OutputFormatter) -> Result<()> {
    let store = open_store(&config).await?;
    let state = AppState::from_config(&config, store)?;
    let router = build_router(state, config.static_dir.as_deref());

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "SupportLab listening");
    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "listening",
            "address": format!("http://{addr}"),
        }))?;
    } else {
        output.success(&format!("SupportLab listening on http://{addr}"));
        output.info("Press Ctrl-C to stop");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Shutdown requested");
}
