//! Page handler for every host kind

use activist_core::{TenantConfig, derive_style};
use activist_render::theme_anomalies;
use activist_routing::RouteContext;
use askama::Template;
use axum::{
    Extension,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::app::AppState;
use crate::handlers::admin::dashboard;
use crate::pages::{
    LandingTemplate, NotFoundTemplate, SectionTemplate, TenantForm, TenantRow, TenantTemplate,
    render_page,
};

/// Fallback for every path without a dedicated route.
pub async fn page(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let at_root = uri.path() == "/";
    match context {
        RouteContext::Admin if at_root => {
            dashboard(&state, StatusCode::OK, String::new(), TenantForm::default())
        }
        RouteContext::PublicHost if at_root => landing(&state),
        RouteContext::Public { tenant } => tenant_page(&state, &tenant, uri.path()),
        _ => not_found(&state),
    }
}

fn landing(state: &AppState) -> Response {
    let hosts = state.resolver.hosts();
    let sites = state
        .store
        .list()
        .iter()
        .map(|tenant| TenantRow::new(tenant, &hosts.root_host))
        .collect();

    render_page(
        StatusCode::OK,
        &LandingTemplate {
            admin_host: hosts.admin_host.clone(),
            root_host: hosts.root_host.clone(),
            sites,
        },
    )
}

fn not_found(state: &AppState) -> Response {
    render_page(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            root_host: state.resolver.hosts().root_host.clone(),
        },
    )
}

fn tenant_page(state: &AppState, tenant: &TenantConfig, path: &str) -> Response {
    state.renderer.report(&theme_anomalies(&tenant.theme));

    let section = |title: String, text: &str| {
        SectionTemplate {
            title,
            text: text.to_string(),
        }
        .render()
    };

    let (status, body) = match path.trim_end_matches('/') {
        "" => (
            StatusCode::OK,
            Ok(state.renderer.render(&tenant.landing_page_blocks).to_html()),
        ),
        "/events" => (
            StatusCode::OK,
            section(
                "Upcoming Events".to_string(),
                "No events are scheduled right now. Check back soon.",
            ),
        ),
        "/donate" => (
            StatusCode::OK,
            section(
                format!("Support {}", tenant.name),
                "Online donations are not open yet. Reach out to the organizers to contribute.",
            ),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            section(
                "Page not found".to_string(),
                "This page does not exist on this site.",
            ),
        ),
    };

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to render section for tenant '{}': {}", tenant.slug, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    render_page(
        status,
        &TenantTemplate {
            name: tenant.name.clone(),
            style: derive_style(&tenant.theme).to_inline_css(),
            body,
            chat_enabled: state.chat.is_some(),
        },
    )
}
