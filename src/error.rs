//! Error types for SupportLab
//!
//! All fallible operations in the crate return [`Result`], whose error side is
//! [`SupportLabError`]. The web layer maps these onto user-facing notices or
//! error pages in [`crate::web::error`].

use crate::core::ValidationError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SupportLabError>;

/// Main error type for SupportLab
#[derive(Error, Debug)]
pub enum SupportLabError {
    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// User input broke a required-field or whitelist rule
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The referenced ticket does not exist
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: i64 },

    /// Template loading or rendering failed
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The in-memory store's lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Anything else
    #[error("{0}")]
    Custom(String),
}

impl SupportLabError {
    /// Create a custom error from any displayable message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}
