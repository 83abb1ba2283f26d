//! Test utilities for SupportLab
//!
//! Shared fixtures: ready-made tickets, a throwaway SQLite database and a
//! seeded application state.

#![cfg(test)]

use crate::core::{Category, Priority, Status, Ticket, TicketId};
use crate::storage::{MemoryStore, SqliteStore, TicketStore};
use crate::templates::Renderer;
use crate::web::AppState;
use crate::web::flash::FlashSigner;
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret-key";

/// SQLite store backed by a file in a temporary directory
pub struct TestDatabase {
    pub temp_dir: TempDir,
    pub store: SqliteStore,
}

impl TestDatabase {
    /// Create a database with the ticket table in place
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("supportlab.db"));
        store.init_schema().await.expect("Failed to create schema");
        Self { temp_dir, store }
    }
}

/// Create a test ticket with default values
pub fn create_test_ticket(id: TicketId, titre: &str, statut: Status) -> Ticket {
    Ticket {
        id,
        titre: titre.to_string(),
        description: format!("Description de {titre}"),
        categorie: Category::Logiciel,
        priorite: Priority::Moyenne,
        statut,
        note: Some(String::new()),
        date_creation: Utc::now(),
    }
}

/// Test data builder for seeded stores
#[derive(Default)]
pub struct TestDataBuilder {
    tickets: Vec<Ticket>,
}

impl TestDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> TicketId {
        self.tickets.last().map_or(1, |t| t.id + 1)
    }

    /// Add a ticket with specific properties
    pub fn with_ticket(mut self, titre: &str, priorite: Priority, statut: Status) -> Self {
        let mut ticket = create_test_ticket(self.next_id(), titre, statut);
        ticket.priorite = priorite;
        self.tickets.push(ticket);
        self
    }

    /// Add multiple tickets with the same status
    pub fn with_tickets_in_status(mut self, statut: Status, count: usize) -> Self {
        for i in 1..=count {
            let ticket = create_test_ticket(self.next_id(), &format!("{statut} {i}"), statut);
            self.tickets.push(ticket);
        }
        self
    }

    pub fn build(self) -> Vec<Ticket> {
        self.tickets
    }

    pub fn into_store(self) -> MemoryStore {
        MemoryStore::with_tickets(self.tickets)
    }
}

/// Application state around `store` with the built-in templates
pub fn test_state(store: Arc<dyn TicketStore>) -> AppState {
    AppState::new(
        store,
        Renderer::new().expect("Failed to load templates"),
        FlashSigner::new(TEST_SECRET).expect("Failed to create signer"),
    )
}
