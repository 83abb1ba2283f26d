//! Command-line interface
//!
//! `supportlab serve` runs the web application; `init-db` and `report` work
//! directly against the configured database.

pub mod handlers;
mod output;

pub use output::OutputFormatter;

use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "supportlab",
    author,
    version,
    about = "Support ticket tracker",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (defaults to ./supportlab.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web application
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// Keep tickets in memory instead of SQLite
        #[arg(long)]
        memory: bool,
    },

    /// Create the ticket table if it does not exist
    InitDb {
        /// SQLite database file
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,
    },

    /// Print ticket statistics
    Report {
        /// SQLite database file
        #[arg(long, value_name = "PATH")]
        database: Option<PathBuf>,
    },
}

impl Commands {
    /// Configuration values given as flags of this command
    pub fn overrides(&self) -> ConfigOverrides {
        match self {
            Self::Serve {
                host,
                port,
                database,
                memory,
            } => ConfigOverrides {
                host: host.clone(),
                port: *port,
                database_path: database.clone(),
                memory: *memory,
            },
            Self::InitDb { database } | Self::Report { database } => ConfigOverrides {
                database_path: database.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}
