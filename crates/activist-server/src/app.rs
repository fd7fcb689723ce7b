//! Application state and router assembly

use activist_core::Result as CoreResult;
use activist_egress::ChatAssistant;
use activist_observability::{HealthState, Metrics, ReadinessChecker, health_router};
use activist_render::BlockRenderer;
use activist_routing::DomainResolver;
use activist_store::TenantStore;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::outcome_label;
use crate::handlers;
use crate::middleware::route_context_middleware;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TenantStore>,
    pub resolver: Arc<DomainResolver>,
    pub renderer: BlockRenderer,
    /// `None` when no chat backend is configured
    pub chat: Option<Arc<dyn ChatAssistant>>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        store: Arc<TenantStore>,
        resolver: DomainResolver,
        metrics: Arc<Metrics>,
        chat: Option<Arc<dyn ChatAssistant>>,
    ) -> Self {
        metrics.set_tenant_count(store.len());
        Self {
            store,
            resolver: Arc::new(resolver),
            renderer: BlockRenderer::with_metrics(metrics.clone()),
            chat,
            metrics,
        }
    }

    /// Count a store mutation and refresh the tenant gauge.
    pub fn record_mutation<T>(&self, op: &str, result: &CoreResult<T>) {
        self.metrics.record_store_mutation(op, outcome_label(result));
        self.metrics.set_tenant_count(self.store.len());
    }
}

/// Readiness backed by the tenant store
pub struct StoreReadiness {
    store: Arc<TenantStore>,
}

impl StoreReadiness {
    pub fn new(store: Arc<TenantStore>) -> Self {
        Self { store }
    }
}

impl ReadinessChecker for StoreReadiness {
    fn is_ready(&self) -> bool {
        // The store always starts with a usable map, persisted or built in
        true
    }

    fn tenant_count(&self) -> usize {
        self.store.len()
    }

    fn source(&self) -> Option<String> {
        Some(self.store.origin().as_str().to_string())
    }
}

/// Build the full application router.
///
/// Health endpoints answer on every host. Everything else passes through the
/// route context middleware first.
pub fn build_router(state: AppState) -> Router {
    let health = health_router(HealthState::with_readiness_checker(
        state.metrics.clone(),
        Arc::new(StoreReadiness::new(state.store.clone())),
    ));

    let site = Router::new()
        // Admin host only
        .route("/tenants", post(handlers::admin::create_tenant_form))
        .route("/tenants/{slug}/delete", post(handlers::admin::delete_tenant_form))
        .route(
            "/api/tenants",
            get(handlers::api::list_tenants).post(handlers::api::create_tenant),
        )
        .route(
            "/api/tenants/{slug}",
            get(handlers::api::get_tenant).delete(handlers::api::delete_tenant),
        )
        // Tenant hosts only
        .route("/api/chat", post(handlers::chat::chat))
        // Static assets (embedded in binary)
        .route("/static/site.css", get(handlers::static_files::serve_css))
        .route("/static/chat.js", get(handlers::static_files::serve_chat_js))
        // Pages for every host kind
        .fallback(handlers::site::page)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            route_context_middleware,
        ))
        .with_state(state);

    health.merge(site).layer(TraceLayer::new_for_http())
}
