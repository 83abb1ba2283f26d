use super::{Category, NewTicket, Priority};

/// Builder for creating `NewTicket` instances
///
/// Unset fields fall back to a generic software ticket of medium priority.
#[derive(Default)]
pub struct NewTicketBuilder {
    titre: Option<String>,
    description: Option<String>,
    categorie: Option<Category>,
    priorite: Option<Priority>,
    note: Option<String>,
}

impl NewTicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn titre(mut self, titre: impl Into<String>) -> Self {
        self.titre = Some(titre.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category
    #[must_use]
    pub const fn categorie(mut self, categorie: Category) -> Self {
        self.categorie = Some(categorie);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priorite(mut self, priorite: Priority) -> Self {
        self.priorite = Some(priorite);
        self
    }

    /// Set the note
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Build the ticket
    pub fn build(self) -> NewTicket {
        let titre = self.titre.unwrap_or_else(|| "Nouveau ticket".to_string());
        NewTicket {
            description: self
                .description
                .unwrap_or_else(|| format!("Description de {titre}")),
            titre,
            categorie: self.categorie.unwrap_or(Category::Logiciel),
            priorite: self.priorite.unwrap_or(Priority::Moyenne),
            note: self.note.unwrap_or_default(),
        }
    }
}
