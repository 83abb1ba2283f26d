//! HTTP surface
//!
//! Routes map one-to-one onto the handlers in [`handlers`]. Unknown paths and
//! non-integer ticket ids fall through to the rendered 404 page.

pub mod error;
pub mod flash;
pub mod handlers;
mod state;

pub use error::{AppError, ErrorPage};
pub use state::AppState;

use axum::{Router, middleware, routing::get, routing::post};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Build the application router
///
/// When `static_dir` is set its files are served under `/static`.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/tickets", get(handlers::list_tickets))
        .route(
            "/tickets/new",
            get(handlers::new_ticket_form).post(handlers::create_ticket),
        )
        .route("/tickets/:id", get(handlers::ticket_detail))
        .route("/tickets/:id/status", post(handlers::update_status))
        .route("/tickets/:id/note", post(handlers::update_note))
        .route("/tickets/:id/delete", post(handlers::delete_ticket))
        .route("/reports", get(handlers::reports))
        .route("/settings", get(handlers::settings));

    if let Some(dir) = static_dir {
        tracing::debug!(dir = %dir.display(), "Serving static files");
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error::render_error_pages,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
