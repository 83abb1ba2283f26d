//! Core domain types: the ticket, its whitelisted labels, list filters,
//! report aggregates and validation rules.

mod builders;
mod filter;
mod priority;
mod stats;
mod status;
mod ticket;
pub mod validation;

pub use builders::NewTicketBuilder;
pub use filter::TicketFilter;
pub use priority::{Category, Priority};
pub use stats::{GroupCount, RECENT_WINDOW_DAYS, TicketStats};
pub use status::{Status, UnknownLabel};
pub use ticket::{NewTicket, Ticket, TicketId};
pub use validation::{
    NewTicketForm, ValidationError, is_in_whitelist, require_nonempty, validate_new_ticket,
    validate_status,
};
