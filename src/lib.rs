//! SupportLab - a small support ticket tracker
//!
//! Users create tickets through a web form, browse and filter them, change
//! their status, attach a note, delete them, and look at summary statistics.
//!
//! - [`core`]: the ticket model, its whitelisted labels and the validation rules
//! - [`storage`]: the [`storage::TicketStore`] trait with SQLite and in-memory backends
//! - [`web`]: the axum router, handlers, flash notices and error pages
//! - [`templates`]: Tera page rendering
//! - [`config`] and [`cli`]: layered settings and the `supportlab` command

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::doc_markdown)]

//! # Example
//!
//! ```rust,ignore
//! use supportlab::core::{NewTicketForm, validate_new_ticket};
//! use supportlab::storage::{MemoryStore, TicketStore};
//!
//! let store = MemoryStore::new();
//! let form = NewTicketForm {
//!     titre: "Printer jam".into(),
//!     description: "Tray 2 stuck".into(),
//!     categorie: "Matériel".into(),
//!     priorite: "Haute".into(),
//!     note: String::new(),
//! };
//! let ticket = store.insert(validate_new_ticket(&form)?).await?;
//! assert_eq!(ticket.statut.as_str(), "Ouvert");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod templates;
pub mod web;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{Result, SupportLabError};
