//! Input validation rules
//!
//! Pure functions with no access to storage. Creation checks title,
//! description, priority and category in that order and reports the first
//! failure; status updates check the status whitelist. Notes are never
//! validated.

use super::{Category, NewTicket, Priority, Status};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why submitted input was rejected
///
/// The display text is the notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Le titre est obligatoire.")]
    MissingTitle,
    #[error("La description est obligatoire.")]
    MissingDescription,
    #[error("La priorité doit être l'une des suivantes : Basse, Moyenne, Haute.")]
    InvalidPriority,
    #[error("Catégorie invalide")]
    InvalidCategory,
    #[error("Statut invalide")]
    InvalidStatus,
}

/// Raw fields posted by the creation form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicketForm {
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categorie: String,
    #[serde(default)]
    pub priorite: String,
    #[serde(default)]
    pub note: String,
}

impl NewTicketForm {
    /// Copy of the form with every field trimmed
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            titre: self.titre.trim().to_string(),
            description: self.description.trim().to_string(),
            categorie: self.categorie.trim().to_string(),
            priorite: self.priorite.trim().to_string(),
            note: self.note.trim().to_string(),
        }
    }
}

pub fn require_nonempty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Exact, case-sensitive membership test
pub fn is_in_whitelist(value: &str, set: &[&str]) -> bool {
    set.contains(&value)
}

/// Validate a creation form and turn it into a storable ticket
pub fn validate_new_ticket(form: &NewTicketForm) -> Result<NewTicket, ValidationError> {
    let form = form.trimmed();

    if !require_nonempty(&form.titre) {
        return Err(ValidationError::MissingTitle);
    }
    if !require_nonempty(&form.description) {
        return Err(ValidationError::MissingDescription);
    }
    if !is_in_whitelist(&form.priorite, &Priority::LABELS) {
        return Err(ValidationError::InvalidPriority);
    }
    if !is_in_whitelist(&form.categorie, &Category::LABELS) {
        return Err(ValidationError::InvalidCategory);
    }

    let priorite = form
        .priorite
        .parse::<Priority>()
        .map_err(|_| ValidationError::InvalidPriority)?;
    let categorie = form
        .categorie
        .parse::<Category>()
        .map_err(|_| ValidationError::InvalidCategory)?;

    Ok(NewTicket {
        titre: form.titre,
        description: form.description,
        categorie,
        priorite,
        note: form.note,
    })
}

/// Validate a submitted status label
pub fn validate_status(value: &str) -> Result<Status, ValidationError> {
    let value = value.trim();
    if !is_in_whitelist(value, &Status::LABELS) {
        return Err(ValidationError::InvalidStatus);
    }
    value.parse().map_err(|_| ValidationError::InvalidStatus)
}
