use crate::core::{NewTicket, Status, Ticket, TicketFilter, TicketId, TicketStats};
use crate::error::{Result, SupportLabError};
use async_trait::async_trait;

/// Store trait for ticket persistence
///
/// Every call is its own unit of work: mutations are visible to the next
/// call as soon as they return, and nothing spans several calls. Whitelists
/// are not enforced here; callers validate before writing.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Lists tickets matching `filter`, newest id first
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>>;

    /// Fetches a ticket by id
    async fn get(&self, id: TicketId) -> Result<Option<Ticket>>;

    /// Stores a new ticket with status `Ouvert` and returns it with its id
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket>;

    /// Overwrites the status; returns `false` when the id is absent
    async fn update_status(&self, id: TicketId, status: Status) -> Result<bool>;

    /// Overwrites the note; returns `false` when the id is absent
    async fn update_note(&self, id: TicketId, note: &str) -> Result<bool>;

    /// Removes a ticket; returns whether anything was removed
    async fn delete(&self, id: TicketId) -> Result<bool>;

    /// Computes the counts shown on the reports page
    async fn aggregate_counts(&self) -> Result<TicketStats>;

    /// Fetches a ticket, treating absence as an error
    async fn load(&self, id: TicketId) -> Result<Ticket> {
        self.get(id)
            .await?
            .ok_or(SupportLabError::TicketNotFound { id })
    }
}
