//! HTTP-facing errors
//!
//! [`AppError`] is what handlers return when a request cannot produce its
//! normal page. The response it builds carries an [`ErrorPage`] extension;
//! [`render_error_pages`] swaps the plain body for the rendered template.

use super::AppState;
use super::flash::Flash;
use crate::error::SupportLabError;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

/// Which error template replaces the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    NotFound,
    Internal,
}

impl ErrorPage {
    pub const fn template(self) -> &'static str {
        match self {
            Self::NotFound => "404.html",
            Self::Internal => "500.html",
        }
    }

    const fn fallback_body(self) -> &'static str {
        match self {
            Self::NotFound => "Page introuvable",
            Self::Internal => "Erreur interne",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// Logged, never shown to the user
    message: String,
    source: Option<SupportLabError>,
}

impl AppError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[must_use]
    pub fn with_source(mut self, source: SupportLabError) -> Self {
        self.source = Some(source);
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    fn page(&self) -> ErrorPage {
        if self.status.is_server_error() {
            ErrorPage::Internal
        } else {
            ErrorPage::NotFound
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<SupportLabError> for AppError {
    fn from(error: SupportLabError) -> Self {
        match error {
            SupportLabError::TicketNotFound { .. } => Self::not_found().with_source(error),
            other => Self::internal("Request failed").with_source(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    "Internal server error"
                ),
            }
        }

        let page = self.page();
        let mut response = (self.status, page.fallback_body()).into_response();
        response.extensions_mut().insert(page);
        response
    }
}

/// Replace bodies of responses marked with [`ErrorPage`] by the rendered template
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(page) = response.extensions().get::<ErrorPage>().copied() else {
        return response;
    };

    let status = response.status();
    let mut context = tera::Context::new();
    context.insert("messages", &Vec::<Flash>::new());

    match state.renderer.render(page.template(), &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(template = page.template(), error = %e, "Error page rendering failed");
            response
        },
    }
}
