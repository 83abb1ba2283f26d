//! Request handlers
//!
//! Each handler reads request input, calls the validation rules and the
//! ticket store, then either renders a page or redirects with a notice.
//! Storage failures are logged and surfaced as generic notices.

use super::AppState;
use super::error::AppError;
use super::flash::{Flash, clear_cookie, has_flash_cookie};
use crate::SupportLabError;
use crate::core::{
    Category, NewTicketForm, Priority, Status, TicketFilter, TicketId, validate_new_ticket,
    validate_status,
};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tera::Context;

const NOT_FOUND_NOTICE: &str = "Ticket introuvable";

type HandlerResult = std::result::Result<Response, AppError>;

/// Missing or non-urlencoded bodies read as an empty form
#[derive(Debug, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub statut: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub note: String,
}

/// Filter values echoed back into the list form
#[derive(Debug, Default, Serialize)]
struct FilterEcho {
    statut: String,
    priorite: String,
    categorie: String,
    search: String,
}

impl From<&TicketFilter> for FilterEcho {
    fn from(filter: &TicketFilter) -> Self {
        Self {
            statut: filter.statut.clone().unwrap_or_default(),
            priorite: filter.priorite.clone().unwrap_or_default(),
            categorie: filter.categorie.clone().unwrap_or_default(),
            search: filter.search.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Whitelists {
    statuts: [&'static str; 4],
    priorites: [&'static str; 3],
    categories: [&'static str; 4],
}

const WHITELISTS: Whitelists = Whitelists {
    statuts: Status::LABELS,
    priorites: Priority::LABELS,
    categories: Category::LABELS,
};

/// Render a page, showing pending notices plus `notices` and consuming the
/// flash cookie
fn render_page(
    state: &AppState,
    headers: &HeaderMap,
    template: &str,
    mut context: Context,
    notices: Vec<Flash>,
) -> HandlerResult {
    let mut messages = state.flash.read(headers);
    messages.extend(notices);
    context.insert("messages", &messages);

    let html = state.renderer.render(template, &context)?;
    let mut response = Html(html).into_response();
    if has_flash_cookie(headers) {
        response.headers_mut().append(header::SET_COOKIE, clear_cookie());
    }
    Ok(response)
}

/// Redirect with 303 See Other, queueing a notice for the next page
fn redirect_with(state: &AppState, headers: &HeaderMap, to: &str, notice: Flash) -> HandlerResult {
    let mut pending = state.flash.read(headers);
    pending.push(notice);
    let cookie = state.flash.set_cookie(&pending)?;

    let mut response = Redirect::to(to).into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Route ids only match integers; anything else is the 404 page
fn parse_id(raw: &str) -> std::result::Result<TicketId, AppError> {
    raw.parse().map_err(|_| AppError::not_found())
}

fn detail_path(id: TicketId) -> String {
    format!("/tickets/{id}")
}

fn form_context(form: &NewTicketForm) -> Context {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("priorites", &Priority::LABELS);
    context.insert("categories", &Category::LABELS);
    context
}

pub async fn index() -> Redirect {
    Redirect::to("/tickets")
}

pub async fn list_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<TicketFilter>,
) -> HandlerResult {
    let filter = filter.normalized();
    let mut notices = Vec::new();

    let tickets = match state.store.list(&filter).await {
        Ok(tickets) => {
            tracing::debug!(filtered = !filter.is_empty(), count = tickets.len(), "Listed tickets");
            tickets
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to list tickets");
            notices.push(Flash::danger("Erreur lors du chargement des tickets"));
            Vec::new()
        },
    };

    let mut context = Context::new();
    context.insert("tickets", &tickets);
    context.insert("filters", &FilterEcho::from(&filter));
    context.insert("statuts", &Status::LABELS);
    context.insert("priorites", &Priority::LABELS);
    context.insert("categories", &Category::LABELS);

    render_page(&state, &headers, "tickets_list.html", context, notices)
}

pub async fn new_ticket_form(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let context = form_context(&NewTicketForm::default());
    render_page(&state, &headers, "ticket_new.html", context, Vec::new())
}

pub async fn create_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<NewTicketForm>,
) -> HandlerResult {
    let form = form.trimmed();

    let ticket = match validate_new_ticket(&form) {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::debug!(reason = %e, "Rejected ticket creation");
            let notices = vec![Flash::danger(e.to_string())];
            return render_page(&state, &headers, "ticket_new.html", form_context(&form), notices);
        },
    };

    match state.store.insert(ticket).await {
        Ok(ticket) => {
            tracing::info!(id = ticket.id, titre = %ticket.titre, "Ticket created");
            redirect_with(&state, &headers, "/tickets", Flash::success("Ticket créé avec succès !"))
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to create ticket");
            let notices = vec![Flash::danger(
                "Une erreur est survenue lors de la création du ticket",
            )];
            render_page(&state, &headers, "ticket_new.html", form_context(&form), notices)
        },
    }
}

pub async fn ticket_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&raw_id)?;

    match state.store.load(id).await {
        Ok(ticket) => {
            let mut context = Context::new();
            context.insert("ticket", &ticket);
            context.insert("statuts", &Status::LABELS);
            render_page(&state, &headers, "ticket_details.html", context, Vec::new())
        },
        Err(SupportLabError::TicketNotFound { .. }) => {
            redirect_with(&state, &headers, "/tickets", Flash::warning(NOT_FOUND_NOTICE))
        },
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to load ticket");
            redirect_with(
                &state,
                &headers,
                "/tickets",
                Flash::danger("Erreur lors de la récupération du ticket"),
            )
        },
    }
}

pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    form: Option<Form<StatusForm>>,
) -> HandlerResult {
    let id = parse_id(&raw_id)?;
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let status = match validate_status(&form.statut) {
        Ok(status) => status,
        Err(e) => {
            tracing::debug!(id, statut = %form.statut, "Rejected status update");
            return redirect_with(&state, &headers, &detail_path(id), Flash::danger(e.to_string()));
        },
    };

    match state.store.update_status(id, status).await {
        Ok(true) => {
            tracing::info!(id, statut = %status, "Ticket status updated");
            redirect_with(
                &state,
                &headers,
                &detail_path(id),
                Flash::success("Statut mis à jour avec succès"),
            )
        },
        Ok(false) => redirect_with(&state, &headers, "/tickets", Flash::warning(NOT_FOUND_NOTICE)),
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to update ticket status");
            redirect_with(
                &state,
                &headers,
                &detail_path(id),
                Flash::danger("Erreur lors de la mise à jour"),
            )
        },
    }
}

pub async fn update_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    form: Option<Form<NoteForm>>,
) -> HandlerResult {
    let id = parse_id(&raw_id)?;
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let note = form.note.trim();

    match state.store.update_note(id, note).await {
        Ok(true) => {
            tracing::info!(id, cleared = note.is_empty(), "Ticket note updated");
            let notice = if note.is_empty() {
                Flash::info("Note supprimée")
            } else {
                Flash::success("Note mise à jour avec succès")
            };
            redirect_with(&state, &headers, &detail_path(id), notice)
        },
        Ok(false) => redirect_with(&state, &headers, "/tickets", Flash::warning(NOT_FOUND_NOTICE)),
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to update ticket note");
            redirect_with(
                &state,
                &headers,
                &detail_path(id),
                Flash::danger("Erreur lors de la mise à jour de la note"),
            )
        },
    }
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&raw_id)?;

    let notice = match state.store.delete(id).await {
        Ok(true) => {
            tracing::info!(id, "Ticket deleted");
            Flash::success("Ticket supprimé avec succès")
        },
        Ok(false) => Flash::danger(NOT_FOUND_NOTICE),
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to delete ticket");
            Flash::danger("Erreur lors de la suppression")
        },
    };

    redirect_with(&state, &headers, "/tickets", notice)
}

pub async fn reports(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let mut context = Context::new();
    let mut notices = Vec::new();

    match state.store.aggregate_counts().await {
        Ok(stats) => context.insert("stats", &stats),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compute ticket statistics");
            notices.push(Flash::danger("Erreur lors du chargement des rapports"));
            context.insert("stats", &Option::<()>::None);
        },
    }

    render_page(&state, &headers, "reports.html", context, notices)
}

pub async fn settings(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let mut context = Context::new();
    context.insert("config", &WHITELISTS);
    render_page(&state, &headers, "settings.html", context, Vec::new())
}

pub async fn not_found() -> AppError {
    AppError::not_found()
}
