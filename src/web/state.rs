//! Shared state handed to every handler

use super::flash::FlashSigner;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::TicketStore;
use crate::templates::Renderer;
use std::sync::Arc;

/// Everything a request needs: the ticket store, the page renderer and the
/// flash-cookie signer
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TicketStore>,
    pub renderer: Arc<Renderer>,
    pub flash: FlashSigner,
}

impl AppState {
    pub fn new(store: Arc<dyn TicketStore>, renderer: Renderer, flash: FlashSigner) -> Self {
        Self {
            store,
            renderer: Arc::new(renderer),
            flash,
        }
    }

    /// Build the state from configuration around an already opened store
    pub fn from_config(config: &AppConfig, store: Arc<dyn TicketStore>) -> Result<Self> {
        let renderer = match &config.templates_dir {
            Some(dir) => Renderer::with_overrides(dir)?,
            None => Renderer::new()?,
        };
        Ok(Self::new(store, renderer, FlashSigner::new(&config.secret_key)?))
    }
}
