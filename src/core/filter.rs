use super::Ticket;
use serde::{Deserialize, Serialize};

/// Narrowing applied by the ticket list
///
/// Every criterion is optional and all present criteria are ANDed. Status,
/// priority and category compare exactly against the stored label, so a value
/// outside the whitelist matches nothing. `search` is a case-sensitive
/// substring test against the title or the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    #[serde(default)]
    pub statut: Option<String>,
    #[serde(default)]
    pub priorite: Option<String>,
    #[serde(default)]
    pub categorie: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl TicketFilter {
    /// Drop empty criteria so that `?statut=` behaves like no filter at all
    #[must_use]
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            statut: keep(self.statut),
            priorite: keep(self.priorite),
            categorie: keep(self.categorie),
            search: keep(self.search),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statut.is_none()
            && self.priorite.is_none()
            && self.categorie.is_none()
            && self.search.is_none()
    }

    /// Check whether a ticket satisfies every present criterion
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(ref statut) = self.statut {
            if ticket.statut.as_str() != statut {
                return false;
            }
        }

        if let Some(ref priorite) = self.priorite {
            if ticket.priorite.as_str() != priorite {
                return false;
            }
        }

        if let Some(ref categorie) = self.categorie {
            if ticket.categorie.as_str() != categorie {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            let search = search.as_str();
            if !ticket.titre.contains(search) && !ticket.description.contains(search) {
                return false;
            }
        }

        true
    }
}
