//! Admin dashboard form handlers

use activist_core::TenantDraft;
use activist_routing::RouteContext;
use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::pages::{DashboardTemplate, TenantForm, TenantRow, render_page};

/// Render the dashboard with an optional error banner.
pub(crate) fn dashboard(
    state: &AppState,
    status: StatusCode,
    error: String,
    form: TenantForm,
) -> Response {
    let root_host = state.resolver.hosts().root_host.clone();
    let tenants = state
        .store
        .list()
        .iter()
        .map(|tenant| TenantRow::new(tenant, &root_host))
        .collect();

    render_page(
        status,
        &DashboardTemplate {
            tenants,
            root_host,
            source: state.store.origin().as_str().to_string(),
            error,
            form,
        },
    )
}

pub async fn create_tenant_form(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    Form(form): Form<TenantForm>,
) -> Response {
    if context != RouteContext::Admin {
        return ApiError::NotFound.into_response();
    }

    let draft = TenantDraft {
        name: form.name.clone(),
        slug: form.slug.clone(),
        description: Some(form.description.clone()),
    };
    let result = match draft.into_tenant() {
        Ok(tenant) => state.store.create(tenant).await,
        Err(e) => Err(e),
    };
    state.record_mutation("create", &result);

    match result {
        Ok(tenant) => {
            info!("Created tenant '{}' from dashboard", tenant.slug);
            Redirect::to("/").into_response()
        }
        Err(e) => {
            let err = ApiError::from(e);
            dashboard(&state, err.status(), err.to_string(), form)
        }
    }
}

pub async fn delete_tenant_form(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    Path(slug): Path<String>,
) -> Response {
    if context != RouteContext::Admin {
        return ApiError::NotFound.into_response();
    }

    let result = state.store.delete(&slug).await;
    state.record_mutation("delete", &result);

    match result {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            let err = ApiError::from(e);
            dashboard(&state, err.status(), err.to_string(), TenantForm::default())
        }
    }
}
