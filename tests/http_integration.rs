//! End-to-end tests of the HTTP surface
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; flash
//! cookies set by a redirect are replayed on the follow-up request.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::sync::Arc;
use supportlab::core::{NewTicketBuilder, Status, TicketFilter};
use supportlab::storage::{MemoryStore, SqliteStore, TicketStore};
use supportlab::templates::Renderer;
use supportlab::web::flash::FlashSigner;
use supportlab::web::{AppState, build_router};
use tempfile::TempDir;
use tower::ServiceExt;

fn app(store: Arc<dyn TicketStore>) -> Router {
    app_with_renderer(store, Renderer::new().unwrap())
}

fn app_with_renderer(store: Arc<dyn TicketStore>, renderer: Renderer) -> Router {
    let state = AppState::new(store, renderer, FlashSigner::new("integration-secret").unwrap());
    build_router(state, None)
}

async fn sqlite_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::new(temp_dir.path().join("supportlab.db"));
    store.init_schema().await.unwrap();
    (temp_dir, Arc::new(store))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

/// `name=value` part of the flash cookie set by a redirect
fn flash_cookie(response: &Response<Body>) -> String {
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
    set_cookie.to_str().unwrap().split(';').next().unwrap().to_string()
}

/// Follow a redirect, carrying its flash cookie, and return the rendered page
async fn follow(router: &Router, response: Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = flash_cookie(&response);
    let target = location(&response).to_string();
    let page = router.clone().oneshot(get_with_cookie(&target, &cookie)).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    body_text(page).await
}

async fn seed(store: &dyn TicketStore, titre: &str, description: &str) -> i64 {
    store
        .insert(NewTicketBuilder::new().titre(titre).description(description).build())
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_root_redirects_to_list() {
    let router = app(Arc::new(MemoryStore::new()));
    let response = router.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tickets");
}

#[tokio::test]
async fn test_create_ticket_assigns_next_id_and_opens_it() {
    let (_dir, store) = sqlite_store().await;
    seed(store.as_ref(), "Mail down", "Outlook").await;
    let previous = seed(store.as_ref(), "VPN down", "No tunnel").await;
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(post_form(
            "/tickets/new",
            "titre=Printer+jam&description=Tray+2+stuck&categorie=Mat%C3%A9riel&priorite=Haute&note=",
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/tickets");
    let page = follow(&router, response).await;
    assert!(page.contains("Ticket créé avec succès !"));
    assert!(page.contains("Printer jam"));

    let created = store.get(previous + 1).await.unwrap().unwrap();
    assert_eq!(created.titre, "Printer jam");
    assert_eq!(created.statut, Status::Ouvert);
    assert_eq!(created.note.as_deref(), Some(""));

    let detail = router
        .oneshot(get(&format!("/tickets/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    let html = body_text(detail).await;
    assert!(html.contains("Printer jam"));
    assert!(html.contains("Tray 2 stuck"));
    assert!(html.contains("Matériel"));
    assert!(html.contains("Haute"));
}

#[tokio::test]
async fn test_invalid_creation_rerenders_form_and_stores_nothing() {
    let store = Arc::new(MemoryStore::new());
    let router = app(store.clone());

    let cases = [
        (
            "titre=++&description=Tray+2+stuck&categorie=Autre&priorite=Basse",
            "Le titre est obligatoire.",
        ),
        (
            "titre=Printer+jam&description=&categorie=Autre&priorite=Basse",
            "La description est obligatoire.",
        ),
        (
            "titre=Printer+jam&description=Tray+2+stuck&categorie=Autre&priorite=Urgent",
            "Basse, Moyenne, Haute.",
        ),
        (
            "titre=Printer+jam&description=Tray+2+stuck&categorie=Cuisine&priorite=Basse",
            "Catégorie invalide",
        ),
    ];

    for (body, notice) in cases {
        let response = router.clone().oneshot(post_form("/tickets/new", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(notice), "missing notice {notice:?}");
        assert!(html.contains("alert-danger"));
    }

    // Entered values survive the round trip
    let response = router
        .oneshot(post_form(
            "/tickets/new",
            "titre=&description=Tray+2+stuck&categorie=R%C3%A9seau&priorite=Haute",
        ))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains(">Tray 2 stuck</textarea>"));
    assert!(html.contains(r#"<option value="Réseau" selected>"#));

    assert!(store.list(&TicketFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first_and_filters() {
    let (_dir, store) = sqlite_store().await;
    seed(store.as_ref(), "Alpha printer", "Tray 2 stuck").await;
    let beta = seed(store.as_ref(), "Beta laptop", "Screen flicker").await;
    seed(store.as_ref(), "Gamma router", "No uplink").await;
    store.update_status(beta, Status::Ferme).await.unwrap();
    let router = app(store);

    let html = body_text(router.clone().oneshot(get("/tickets")).await.unwrap()).await;
    let alpha = html.find("Alpha printer").unwrap();
    let beta_pos = html.find("Beta laptop").unwrap();
    let gamma = html.find("Gamma router").unwrap();
    assert!(gamma < beta_pos && beta_pos < alpha);

    let html = body_text(
        router
            .clone()
            .oneshot(get("/tickets?statut=Ferm%C3%A9&priorite=&categorie=&search="))
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("Beta laptop"));
    assert!(!html.contains("Alpha printer"));
    assert!(html.contains(r#"<option value="Fermé" selected>"#));

    let html = body_text(router.clone().oneshot(get("/tickets?search=Tray")).await.unwrap()).await;
    assert!(html.contains("Alpha printer"));
    assert!(!html.contains("Gamma router"));
    assert!(html.contains(r#"value="Tray""#));

    let html = body_text(router.clone().oneshot(get("/tickets?search=tray")).await.unwrap()).await;
    assert!(html.contains("Aucun ticket."));

    let html = body_text(router.oneshot(get("/tickets?search=absent")).await.unwrap()).await;
    assert!(html.contains("Aucun ticket."));
}

#[tokio::test]
async fn test_status_updates() {
    let store = Arc::new(MemoryStore::new());
    let id = seed(store.as_ref(), "Printer jam", "Tray 2 stuck").await;
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(post_form(&format!("/tickets/{id}/status"), "statut=Archiv%C3%A9"))
        .await
        .unwrap();
    assert_eq!(location(&response), format!("/tickets/{id}"));
    let page = follow(&router, response).await;
    assert!(page.contains("Statut invalide"));
    assert_eq!(store.get(id).await.unwrap().unwrap().statut, Status::Ouvert);

    let response = router
        .clone()
        .oneshot(post_form(&format!("/tickets/{id}/status"), "statut=En+cours"))
        .await
        .unwrap();
    assert_eq!(location(&response), format!("/tickets/{id}"));
    let page = follow(&router, response).await;
    assert!(page.contains("Statut mis à jour avec succès"));
    assert_eq!(store.get(id).await.unwrap().unwrap().statut, Status::EnCours);

    let response = router
        .clone()
        .oneshot(post_form("/tickets/99/status", "statut=Ferm%C3%A9"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/tickets");
    assert!(follow(&router, response).await.contains("Ticket introuvable"));
}

#[tokio::test]
async fn test_bodiless_posts_read_as_empty_forms() {
    let store = Arc::new(MemoryStore::new());
    let id = seed(store.as_ref(), "Printer jam", "Tray 2 stuck").await;
    store.update_note(id, "Called vendor").await.unwrap();
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(post_empty(&format!("/tickets/{id}/status")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/tickets/{id}"));
    assert!(follow(&router, response).await.contains("Statut invalide"));
    assert_eq!(store.get(id).await.unwrap().unwrap().statut, Status::Ouvert);

    let response = router
        .clone()
        .oneshot(post_empty(&format!("/tickets/{id}/note")))
        .await
        .unwrap();
    assert_eq!(location(&response), format!("/tickets/{id}"));
    assert!(follow(&router, response).await.contains("Note supprimée"));
    assert_eq!(store.get(id).await.unwrap().unwrap().note.as_deref(), Some(""));
}

#[tokio::test]
async fn test_note_update_and_clear() {
    let (_dir, store) = sqlite_store().await;
    let id = seed(store.as_ref(), "Printer jam", "Tray 2 stuck").await;
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(post_form(&format!("/tickets/{id}/note"), "note=Called+vendor"))
        .await
        .unwrap();
    let page = follow(&router, response).await;
    assert!(page.contains("Note mise à jour avec succès"));
    assert!(page.contains("Called vendor"));

    let response = router
        .clone()
        .oneshot(post_form(&format!("/tickets/{id}/note"), "note="))
        .await
        .unwrap();
    let page = follow(&router, response).await;
    assert!(page.contains("Note supprimée"));
    assert!(page.contains("alert-info"));
    assert_eq!(store.get(id).await.unwrap().unwrap().note.as_deref(), Some(""));
}

#[tokio::test]
async fn test_delete_existing_and_missing() {
    let store = Arc::new(MemoryStore::new());
    let id = seed(store.as_ref(), "Printer jam", "Tray 2 stuck").await;
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(post_form("/tickets/99/delete", ""))
        .await
        .unwrap();
    assert_eq!(location(&response), "/tickets");
    assert!(follow(&router, response).await.contains("Ticket introuvable"));
    assert!(store.get(id).await.unwrap().is_some());

    let response = router
        .clone()
        .oneshot(post_form(&format!("/tickets/{id}/delete"), ""))
        .await
        .unwrap();
    assert!(follow(&router, response).await.contains("Ticket supprimé avec succès"));
    assert!(store.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_ticket_detail_redirects_with_warning() {
    let router = app(Arc::new(MemoryStore::new()));
    let response = router.clone().oneshot(get("/tickets/42")).await.unwrap();

    assert_eq!(location(&response), "/tickets");
    let page = follow(&router, response).await;
    assert!(page.contains("alert-warning"));
    assert!(page.contains("Ticket introuvable"));
}

#[tokio::test]
async fn test_unknown_routes_and_non_integer_ids_render_404() {
    let router = app(Arc::new(MemoryStore::new()));

    for uri in ["/nope", "/tickets/abc", "/tickets/1.5"] {
        let response = router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(body_text(response).await.contains("Page introuvable"));
    }

    let response = router
        .oneshot(post_form("/tickets/abc/delete", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports_counts_by_status() {
    let (_dir, store) = sqlite_store().await;
    for i in 0..5 {
        let id = seed(store.as_ref(), &format!("Ticket {i}"), "desc").await;
        if i >= 3 {
            store.update_status(id, Status::Ferme).await.unwrap();
        }
    }
    let router = app(store);

    let response = router.oneshot(get("/reports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<div class="text-muted">Total</div><div class="fs-3">5</div>"#));
    assert!(html.contains(r#"<div class="text-muted">Ouverts</div><div class="fs-3">3</div>"#));
    assert!(html.contains(r#"<div class="text-muted">Fermés</div><div class="fs-3">2</div>"#));
}

#[tokio::test]
async fn test_storage_failures_show_generic_notices() {
    let temp_dir = TempDir::new().unwrap();
    // No schema: every query fails
    let store = Arc::new(SqliteStore::new(temp_dir.path().join("broken.db")));
    let router = app(store);

    let html = body_text(router.clone().oneshot(get("/tickets")).await.unwrap()).await;
    assert!(html.contains("Erreur lors du chargement des tickets"));
    assert!(html.contains("Aucun ticket."));
    assert!(!html.contains("no such table"));

    let html = body_text(router.clone().oneshot(get("/reports")).await.unwrap()).await;
    assert!(html.contains("Erreur lors du chargement des rapports"));
    assert!(html.contains("Statistiques indisponibles."));

    let response = router
        .clone()
        .oneshot(post_form(
            "/tickets/new",
            "titre=Printer+jam&description=Tray+2+stuck&categorie=Autre&priorite=Basse",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Une erreur est survenue lors de la création du ticket"));
    assert!(html.contains(r#"value="Printer jam""#));

    let response = router.clone().oneshot(get("/tickets/1")).await.unwrap();
    assert_eq!(location(&response), "/tickets");
    assert!(follow(&router, response).await.contains("Erreur lors de la récupération du ticket"));

    // Detail pages fail too, so notices are read back from the list page
    let cases = [
        ("/tickets/1/status", "statut=En+cours", "/tickets/1", "Erreur lors de la mise à jour"),
        (
            "/tickets/1/note",
            "note=Called+vendor",
            "/tickets/1",
            "Erreur lors de la mise à jour de la note",
        ),
        ("/tickets/1/delete", "", "/tickets", "Erreur lors de la suppression"),
    ];
    for (uri, body, target, notice) in cases {
        let response = router.clone().oneshot(post_form(uri, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), target, "{uri}");

        let cookie = flash_cookie(&response);
        let page = router
            .clone()
            .oneshot(get_with_cookie("/tickets", &cookie))
            .await
            .unwrap();
        let html = body_text(page).await;
        assert!(html.contains(notice), "missing notice {notice:?}");
        assert!(!html.contains("no such table"));
    }
}

#[tokio::test]
async fn test_list_keeps_valid_tickets_beside_unknown_labels() {
    let (dir, store) = sqlite_store().await;
    seed(store.as_ref(), "Valid ticket", "Tray 2 stuck").await;

    let mut conn = SqliteConnectOptions::new()
        .filename(dir.path().join("supportlab.db"))
        .connect()
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO tickets (titre, description, categorie, priorite, statut)
         VALUES ('Legacy ticket', 'y', 'Support utilisateur', 'Normale', 'Ouvert')",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    conn.close().await.unwrap();

    let router = app(store);
    let response = router.clone().oneshot(get("/tickets")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Valid ticket"));
    assert!(!html.contains("Legacy ticket"));
    assert!(!html.contains("Erreur lors du chargement des tickets"));

    let html = body_text(router.oneshot(get("/reports")).await.unwrap()).await;
    assert!(html.contains(r#"<div class="text-muted">Total</div><div class="fs-3">2</div>"#));
}

#[tokio::test]
async fn test_template_failure_renders_500_page() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.html"),
        "{{ undefined_variable.field }}",
    )
    .unwrap();
    let renderer = Renderer::with_overrides(temp_dir.path()).unwrap();
    let router = app_with_renderer(Arc::new(MemoryStore::new()), renderer);

    let response = router.oneshot(get("/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Erreur interne"));
}

#[tokio::test]
async fn test_forged_flash_cookie_is_ignored() {
    let router = app(Arc::new(MemoryStore::new()));
    let forged = FlashSigner::new("another-secret")
        .unwrap()
        .encode(&[supportlab::web::flash::Flash::success("forged notice")])
        .unwrap();

    let response = router
        .oneshot(get_with_cookie("/tickets", &format!("supportlab_flash={forged}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(!html.contains("forged notice"));
    assert!(!html.contains("alert-success"));
}
