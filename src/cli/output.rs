//! Terminal output for CLI commands
//!
//! Human-readable output is colored unless disabled; `--json` switches every
//! command to machine-readable JSON on stdout.

use crate::core::{GroupCount, TicketStats};
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, msg: &str) {
        if !self.json {
            println!("{} {}", "✓".green().bold(), msg);
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.json {
            println!("{msg}");
        }
    }

    /// Errors always go to stderr, also in JSON mode
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "status": "error", "message": msg }));
        } else {
            eprintln!("{} {}", "✗".red().bold(), msg);
        }
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print ticket statistics as a short text report
    pub fn print_report(&self, stats: &TicketStats) {
        println!("{}", "Rapport des tickets".bold());
        println!("  Total            {}", stats.total.to_string().bold());
        println!("  Ouverts          {}", stats.ouverts);
        println!("  En cours         {}", stats.en_cours);
        println!("  Résolus          {}", stats.resolus);
        println!("  Fermés           {}", stats.fermes);
        println!("  7 derniers jours {}", stats.recents);

        print_groups("Par priorité", &stats.repartition_priorite);
        print_groups("Par catégorie", &stats.repartition_categorie);
    }
}

fn print_groups(title: &str, groups: &[GroupCount]) {
    println!();
    println!("{}", title.bold());
    if groups.is_empty() {
        println!("  {}", "Aucune donnée".dimmed());
    }
    for group in groups {
        println!("  {:<16} {}", group.label, group.count);
    }
}
