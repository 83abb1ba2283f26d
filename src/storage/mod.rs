//! Ticket persistence
//!
//! [`TicketStore`] is the only way handlers reach tickets. Two backends
//! implement it: [`SqliteStore`] for durable storage and [`MemoryStore`] for
//! throwaway instances and tests.

mod memory;
pub mod repository;
mod sqlite;

pub use memory::MemoryStore;
pub use repository::TicketStore;
pub use sqlite::SqliteStore;

use crate::config::{AppConfig, StorageBackend};
use crate::error::Result;
use std::sync::Arc;

/// Build the store selected by the configuration, creating the SQLite schema
/// when needed
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn TicketStore>> {
    match config.storage {
        StorageBackend::Sqlite => {
            let store = SqliteStore::new(&config.database_path);
            store.init_schema().await?;
            tracing::info!(path = %store.path().display(), "Using SQLite ticket store");
            Ok(Arc::new(store))
        },
        StorageBackend::Memory => {
            tracing::info!("Using in-memory ticket store; tickets are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        },
    }
}
