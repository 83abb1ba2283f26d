use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a ticket
///
/// Any status may replace any other; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "Ouvert")]
    Ouvert,
    #[serde(rename = "En cours")]
    EnCours,
    #[serde(rename = "Résolu")]
    Resolu,
    #[serde(rename = "Fermé")]
    Ferme,
}

impl Status {
    /// All statuses, in display order
    pub const ALL: [Self; 4] = [Self::Ouvert, Self::EnCours, Self::Resolu, Self::Ferme];

    /// Labels accepted by whitelist validation
    pub const LABELS: [&'static str; 4] = ["Ouvert", "En cours", "Résolu", "Fermé"];

    /// The label stored in the `statut` column
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ouvert => "Ouvert",
            Self::EnCours => "En cours",
            Self::Resolu => "Résolu",
            Self::Ferme => "Fermé",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownLabel::new("statut", s))
    }
}

/// A stored or submitted label that is not part of its whitelist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownLabel {
    pub field: &'static str,
    pub value: String,
}

impl UnknownLabel {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
