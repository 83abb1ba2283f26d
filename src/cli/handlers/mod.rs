//! Command handlers for the CLI

mod database;
mod serve;

pub use database::{handle_init_db_command, handle_report_command};
pub use serve::handle_serve_command;
