use super::status::UnknownLabel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Basse,
    Moyenne,
    Haute,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Basse, Self::Moyenne, Self::Haute];

    pub const LABELS: [&'static str; 3] = ["Basse", "Moyenne", "Haute"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basse => "Basse",
            Self::Moyenne => "Moyenne",
            Self::Haute => "Haute",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownLabel::new("priorite", s))
    }
}

/// Ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Logiciel,
    #[serde(rename = "Matériel")]
    Materiel,
    #[serde(rename = "Réseau")]
    Reseau,
    Autre,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Logiciel, Self::Materiel, Self::Reseau, Self::Autre];

    pub const LABELS: [&'static str; 4] = ["Logiciel", "Matériel", "Réseau", "Autre"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logiciel => "Logiciel",
            Self::Materiel => "Matériel",
            Self::Reseau => "Réseau",
            Self::Autre => "Autre",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownLabel::new("categorie", s))
    }
}
