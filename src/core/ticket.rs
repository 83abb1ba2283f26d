use super::{Category, Priority, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned ticket identifier
pub type TicketId = i64;

/// A support ticket as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub titre: String,
    pub description: String,
    pub categorie: Category,
    pub priorite: Priority,
    pub statut: Status,
    /// Empty string and `None` are both "no note"
    pub note: Option<String>,
    pub date_creation: DateTime<Utc>,
}

/// Validated fields for a ticket that has not been stored yet
///
/// The store assigns `id`, `statut` and `date_creation` on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub titre: String,
    pub description: String,
    pub categorie: Category,
    pub priorite: Priority,
    pub note: String,
}
