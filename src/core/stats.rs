use super::{Status, Ticket};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Tickets created within this many days count as recent
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Number of tickets sharing one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}

/// Aggregate counts shown on the reports page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: i64,
    pub ouverts: i64,
    pub en_cours: i64,
    pub resolus: i64,
    pub fermes: i64,
    pub recents: i64,
    /// Only labels present in the store, ordered by label
    pub repartition_statut: Vec<GroupCount>,
    pub repartition_priorite: Vec<GroupCount>,
    pub repartition_categorie: Vec<GroupCount>,
}

impl TicketStats {
    /// Count a slice of tickets, treating anything created at or after
    /// `now - RECENT_WINDOW_DAYS` as recent
    pub fn from_tickets(tickets: &[Ticket], now: DateTime<Utc>) -> Self {
        let recent_since = now - Duration::days(RECENT_WINDOW_DAYS);

        let mut stats = Self {
            total: count(tickets.len()),
            ..Self::default()
        };

        let mut by_status: BTreeMap<&str, i64> = BTreeMap::new();
        let mut by_priority: BTreeMap<&str, i64> = BTreeMap::new();
        let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();

        for ticket in tickets {
            match ticket.statut {
                Status::Ouvert => stats.ouverts += 1,
                Status::EnCours => stats.en_cours += 1,
                Status::Resolu => stats.resolus += 1,
                Status::Ferme => stats.fermes += 1,
            }

            if ticket.date_creation >= recent_since {
                stats.recents += 1;
            }

            *by_status.entry(ticket.statut.as_str()).or_default() += 1;
            *by_priority.entry(ticket.priorite.as_str()).or_default() += 1;
            *by_category.entry(ticket.categorie.as_str()).or_default() += 1;
        }

        stats.repartition_statut = groups(by_status);
        stats.repartition_priorite = groups(by_priority);
        stats.repartition_categorie = groups(by_category);
        stats
    }
}

fn groups(counts: BTreeMap<&str, i64>) -> Vec<GroupCount> {
    counts
        .into_iter()
        .map(|(label, count)| GroupCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
