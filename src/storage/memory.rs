use super::TicketStore;
use crate::core::{NewTicket, Status, Ticket, TicketFilter, TicketId, TicketStats};
use crate::error::{Result, SupportLabError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

/// In-process ticket store
///
/// Tickets live in insertion order next to a counter that only ever grows,
/// so ids are never reused even after deletes. Contents are lost when the
/// process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    tickets: Vec<Ticket>,
    next_id: TicketId,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            tickets: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing tickets; new ids continue after the
    /// highest seeded one
    pub fn with_tickets(mut tickets: Vec<Ticket>) -> Self {
        tickets.sort_by_key(|t| t.id);
        let next_id = tickets.last().map_or(1, |t| t.id + 1);
        Self {
            state: Mutex::new(MemoryState { tickets, next_id }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| SupportLabError::LockPoisoned)
    }

    fn modify<F>(&self, id: TicketId, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut Ticket),
    {
        let mut state = self.lock()?;
        match state.tickets.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                apply(ticket);
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let state = self.lock()?;
        Ok(state
            .tickets
            .iter()
            .rev()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn get(&self, id: TicketId) -> Result<Option<Ticket>> {
        let state = self.lock()?;
        Ok(state.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, ticket: NewTicket) -> Result<Ticket> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;

        let ticket = Ticket {
            id,
            titre: ticket.titre,
            description: ticket.description,
            categorie: ticket.categorie,
            priorite: ticket.priorite,
            statut: Status::Ouvert,
            note: Some(ticket.note),
            date_creation: Utc::now(),
        };
        state.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn update_status(&self, id: TicketId, status: Status) -> Result<bool> {
        self.modify(id, |ticket| ticket.statut = status)
    }

    async fn update_note(&self, id: TicketId, note: &str) -> Result<bool> {
        self.modify(id, |ticket| ticket.note = Some(note.to_string()))
    }

    async fn delete(&self, id: TicketId) -> Result<bool> {
        let mut state = self.lock()?;
        let before = state.tickets.len();
        state.tickets.retain(|t| t.id != id);
        Ok(state.tickets.len() != before)
    }

    async fn aggregate_counts(&self) -> Result<TicketStats> {
        let state = self.lock()?;
        Ok(TicketStats::from_tickets(&state.tickets, Utc::now()))
    }
}
