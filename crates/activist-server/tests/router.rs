//! Integration tests for the full router
//!
//! Requests go through host resolution, handlers and the tenant store,
//! backed by an in-memory repository.

use activist_egress::ChatAssistant;
use activist_observability::Metrics;
use activist_routing::{DomainResolver, HostConfig};
use activist_server::{AppState, ROUTE_CONTEXT_HEADER, build_router};
use activist_store::{MemoryRepository, TenantStore};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const ADMIN: &str = "app.activist.com";
const ROOT: &str = "activist.com";
const CLIMATE: &str = "climate-action.activist.com";

/// Chat assistant that echoes and records the system instruction
#[derive(Default)]
struct RecordingAssistant {
    instructions: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatAssistant for RecordingAssistant {
    async fn reply(&self, user_text: &str, system_instruction: &str) -> String {
        self.instructions
            .lock()
            .unwrap()
            .push(system_instruction.to_string());
        format!("echo: {}", user_text)
    }
}

struct TestApp {
    router: Router,
    repository: Arc<MemoryRepository>,
    store: Arc<TenantStore>,
    assistant: Arc<RecordingAssistant>,
}

async fn test_app_with(chat: bool) -> TestApp {
    let repository = Arc::new(MemoryRepository::new());
    let store = Arc::new(TenantStore::open(repository.clone()).await);
    let assistant = Arc::new(RecordingAssistant::default());
    let chat: Option<Arc<dyn ChatAssistant>> = if chat {
        Some(assistant.clone() as Arc<dyn ChatAssistant>)
    } else {
        None
    };

    let state = AppState::new(
        store.clone(),
        DomainResolver::new(HostConfig::default()),
        Arc::new(Metrics::new().unwrap()),
        chat,
    );

    TestApp {
        router: build_router(state),
        repository,
        store,
        assistant,
    }
}

async fn test_app() -> TestApp {
    test_app_with(true).await
}

fn get(host: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, host: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, host)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(host: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, host)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn route_context(response: &Response) -> &str {
    response
        .headers()
        .get(ROUTE_CONTEXT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_admin_host_serves_dashboard() {
    let app = test_app().await;
    let response = send(&app, get(ADMIN, "/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(route_context(&response), "admin");
    let html = body_text(response).await;
    assert!(html.contains("Campaign Sites"));
    assert!(html.contains("Climate Action Now"));
    assert!(html.contains("city-bikes.activist.com"));
    assert!(html.contains("tenant data seeded"));
}

#[tokio::test]
async fn test_admin_host_ignores_port_and_case() {
    let app = test_app().await;
    let response = send(&app, get("APP.Activist.com:8080", "/")).await;
    assert_eq!(route_context(&response), "admin");
}

#[tokio::test]
async fn test_root_host_serves_landing() {
    let app = test_app().await;

    for host in [ROOT, "www.activist.com"] {
        let response = send(&app, get(host, "/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(route_context(&response), "public-host");
        let html = body_text(response).await;
        assert!(html.contains("Launch your campaign site"));
        assert!(html.contains("//app.activist.com/"));
    }
}

#[tokio::test]
async fn test_tenant_page_renders_blocks_and_theme() {
    let app = test_app().await;
    let response = send(&app, get(CLIMATE, "/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(route_context(&response), "public");
    let html = body_text(response).await;
    assert!(html.contains("--color-primary: #15803d;"));
    assert!(html.contains("--color-accent: #22c55e;"));
    assert!(html.contains("Mobilizing communities for a sustainable future."));
    assert!(html.contains("data-block=\"hero-main\""));
    assert!(html.contains("/static/chat.js"));
}

#[tokio::test]
async fn test_tenant_sections_and_unknown_path() {
    let app = test_app().await;

    let events = send(&app, get(CLIMATE, "/events")).await;
    assert_eq!(events.status(), StatusCode::OK);
    assert!(body_text(events).await.contains("Upcoming Events"));

    let donate = send(&app, get(CLIMATE, "/donate/")).await;
    assert_eq!(donate.status(), StatusCode::OK);
    assert!(body_text(donate).await.contains("Support Climate Action Now"));

    let missing = send(&app, get(CLIMATE, "/nope")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(route_context(&missing), "public");
    let html = body_text(missing).await;
    assert!(html.contains("Page not found"));
    assert!(html.contains("--color-primary: #15803d;"));
}

#[tokio::test]
async fn test_unknown_host_is_not_found() {
    let app = test_app().await;

    for host in ["nobody.activist.com", "evil.example.org", ""] {
        let response = send(&app, get(host, "/")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "host {:?}", host);
        assert_eq!(route_context(&response), "not-found");
    }
}

#[tokio::test]
async fn test_tenant_page_without_chat() {
    let app = test_app_with(false).await;
    let html = body_text(send(&app, get(CLIMATE, "/")).await).await;
    assert!(!html.contains("/static/chat.js"));
}

#[tokio::test]
async fn test_page_rejects_non_get() {
    let app = test_app().await;
    let response = send(&app, json_request("PUT", CLIMATE, "/", json!({}))).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_api_create_and_serve_new_tenant() {
    let app = test_app().await;

    let response = send(
        &app,
        json_request(
            "POST",
            ADMIN,
            "/api/tenants",
            json!({"name": "Green Earth", "slug": "Green Earth!", "description": "Trees for all."}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let tenant = body_json(response).await;
    assert_eq!(tenant["slug"], "green-earth");
    assert_eq!(tenant["features"], json!(["events"]));
    assert_eq!(tenant["theme"]["secondary"], "#f1f5f9");
    assert_eq!(tenant["landingPageBlocks"][0]["type"], "hero");
    assert_eq!(tenant["landingPageBlocks"][0]["props"]["heading"], "Trees for all.");
    assert!(tenant["id"].as_str().unwrap().starts_with("t_"));

    assert_eq!(app.repository.save_count(), 2);
    assert!(app.store.get_by_slug("green-earth").is_some());

    let page = send(&app, get("green-earth.activist.com", "/")).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("Trees for all."));
}

#[tokio::test]
async fn test_api_create_with_blocks_and_theme() {
    let app = test_app().await;

    let response = send(
        &app,
        json_request(
            "POST",
            ADMIN,
            "/api/tenants",
            json!({
                "name": "Night Owls",
                "slug": "night-owls",
                "customDomain": "nightowls.org",
                "theme": {"primary": "#111111", "secondary": "#222222", "accent": "#333333"},
                "landingPageBlocks": [
                    {"type": "impact", "props": {"title": "Our Impact", "stats": [{"value": "12", "label": "Walks"}]}}
                ]
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let tenant = body_json(response).await;
    assert_eq!(tenant["customDomain"], "nightowls.org");
    assert_eq!(tenant["theme"]["primary"], "#111111");
    assert_eq!(tenant["landingPageBlocks"].as_array().unwrap().len(), 1);
    assert!(tenant["landingPageBlocks"][0]["id"].as_str().unwrap().starts_with("impact-"));
}

#[tokio::test]
async fn test_api_duplicate_slug_conflicts() {
    let app = test_app().await;

    let response = send(
        &app,
        json_request(
            "POST",
            ADMIN,
            "/api/tenants",
            json!({"name": "Copycat", "slug": "climate-action"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 409);
    assert_eq!(app.store.get_by_slug("climate-action").unwrap().name, "Climate Action Now");
}

#[tokio::test]
async fn test_api_invalid_slug_rejected() {
    let app = test_app().await;

    let response = send(
        &app,
        json_request("POST", ADMIN, "/api/tenants", json!({"name": "Bad", "slug": "!!!"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.len(), 2);
}

#[tokio::test]
async fn test_api_save_failure_is_unavailable() {
    let app = test_app().await;
    app.repository.set_fail_saves(true);

    let response = send(
        &app,
        json_request("POST", ADMIN, "/api/tenants", json!({"name": "Later", "slug": "later"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.store.get_by_slug("later").is_none());

    let body = body_json(response).await;
    assert!(!body["error"]["message"].as_str().unwrap().contains("could not be written"));
}

#[tokio::test]
async fn test_api_list_get_delete() {
    let app = test_app().await;

    let list = body_json(send(&app, get(ADMIN, "/api/tenants")).await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let tenant = send(&app, get(ADMIN, "/api/tenants/city-bikes")).await;
    assert_eq!(tenant.status(), StatusCode::OK);
    assert_eq!(body_json(tenant).await["name"], "City Bike Initiative");

    let missing = send(&app, get(ADMIN, "/api/tenants/nobody")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let deleted = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/tenants/city-bikes")
            .header(header::HOST, ADMIN)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(body_json(deleted).await["deleted"], true);
    assert!(app.store.get_by_slug("city-bikes").is_none());

    let page = send(&app, get("city-bikes.activist.com", "/")).await;
    assert_eq!(page.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_delete_unknown_is_noop() {
    let app = test_app().await;
    let saves = app.repository.save_count();

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/tenants/nobody")
            .header(header::HOST, ADMIN)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], false);
    assert_eq!(app.repository.save_count(), saves);
}

#[tokio::test]
async fn test_api_hidden_outside_admin_host() {
    let app = test_app().await;

    for host in [ROOT, CLIMATE, "nobody.activist.com"] {
        let response = send(&app, get(host, "/api/tenants")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "host {}", host);
    }

    let response = send(
        &app,
        json_request("POST", CLIMATE, "/api/tenants", json!({"name": "X", "slug": "x"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.store.get_by_slug("x").is_none());
}

#[tokio::test]
async fn test_dashboard_form_create_redirects() {
    let app = test_app().await;

    let response = send(
        &app,
        form_request(ADMIN, "/tenants", "name=Park+Friends&slug=park-friends&description=Clean+parks."),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(app.store.get_by_slug("park-friends").is_some());
}

#[tokio::test]
async fn test_dashboard_form_duplicate_shows_error() {
    let app = test_app().await;

    let response = send(
        &app,
        form_request(ADMIN, "/tenants", "name=Copy&slug=city-bikes&description="),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let html = body_text(response).await;
    assert!(html.contains("alert-error"));
    assert!(html.contains("already in use"));
}

#[tokio::test]
async fn test_dashboard_form_delete() {
    let app = test_app().await;

    let response = send(&app, form_request(ADMIN, "/tenants/city-bikes/delete", "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.store.get_by_slug("city-bikes").is_none());

    let response = send(&app, form_request(CLIMATE, "/tenants/climate-action/delete", "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.store.get_by_slug("climate-action").is_some());
}

#[tokio::test]
async fn test_chat_on_tenant_host() {
    let app = test_app().await;

    let response = send(
        &app,
        json_request("POST", CLIMATE, "/api/chat", json!({"message": "  When is the next rally? "})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reply"], "echo: When is the next rally?");

    let instructions = app.assistant.instructions.lock().unwrap();
    assert_eq!(instructions.len(), 1);
    assert!(instructions[0].contains("Climate Action Now"));
    assert!(instructions[0].contains("Mobilizing communities for a sustainable future."));
}

#[tokio::test]
async fn test_chat_validation() {
    let app = test_app().await;

    let empty = send(&app, json_request("POST", CLIMATE, "/api/chat", json!({"message": "   "}))).await;
    assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let long = "a".repeat(2001);
    let too_long = send(&app, json_request("POST", CLIMATE, "/api/chat", json!({"message": long}))).await;
    assert_eq!(too_long.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(app.assistant.instructions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_unavailable_outside_tenants_or_when_disabled() {
    let app = test_app().await;
    let response = send(&app, json_request("POST", ADMIN, "/api/chat", json!({"message": "hi"}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let disabled = test_app_with(false).await;
    let response = send(
        &disabled,
        json_request("POST", CLIMATE, "/api/chat", json!({"message": "hi"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_assets_on_any_host() {
    let app = test_app().await;

    let css = send(&app, get(CLIMATE, "/static/site.css")).await;
    assert_eq!(css.status(), StatusCode::OK);
    assert_eq!(css.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
    assert!(body_text(css).await.contains("--color-primary"));

    let js = send(&app, get(ADMIN, "/static/chat.js")).await;
    assert_eq!(js.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoints_answer_on_any_host() {
    let app = test_app().await;

    let health = send(&app, get("nobody.example.org", "/healthz")).await;
    assert_eq!(health.status(), StatusCode::OK);

    let ready = send(&app, get(CLIMATE, "/readyz")).await;
    assert_eq!(ready.status(), StatusCode::OK);
    let body = body_json(ready).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["tenants"], 2);
    assert_eq!(body["source"], "seeded");
}

#[tokio::test]
async fn test_metrics_count_requests_by_context() {
    let app = test_app().await;
    send(&app, get(CLIMATE, "/")).await;
    send(&app, get("nobody.activist.com", "/")).await;

    let metrics = body_text(send(&app, get(ADMIN, "/metrics")).await).await;
    assert!(metrics.contains("context=\"public\""));
    assert!(metrics.contains("context=\"not-found\""));
    assert!(metrics.contains("activist_tenants 2"));
}
