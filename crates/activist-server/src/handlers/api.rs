//! Tenant JSON API, served on the admin host only

use activist_core::{PageBlock, Result as CoreResult, TenantConfig, TenantDraft, TenantTheme};
use activist_routing::RouteContext;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

/// Create payload: the dashboard draft plus optional full-record fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[serde(flatten)]
    pub draft: TenantDraft,
    #[serde(default)]
    pub custom_domain: Option<String>,
    #[serde(default)]
    pub theme: Option<TenantTheme>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub landing_page_blocks: Vec<PageBlock>,
}

impl CreateTenantRequest {
    fn into_tenant(self) -> CoreResult<TenantConfig> {
        let mut tenant = self.draft.into_tenant()?;
        tenant.custom_domain = self.custom_domain.filter(|domain| !domain.trim().is_empty());
        if let Some(theme) = self.theme {
            tenant.theme = theme;
        }
        if let Some(features) = self.features {
            tenant.features = features;
        }
        tenant.landing_page_blocks = self.landing_page_blocks;
        Ok(tenant)
    }
}

fn require_admin(context: &RouteContext) -> Result<(), ApiError> {
    match context {
        RouteContext::Admin => Ok(()),
        _ => Err(ApiError::NotFound),
    }
}

pub async fn list_tenants(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
) -> Result<Json<Vec<TenantConfig>>, ApiError> {
    require_admin(&context)?;
    Ok(Json(state.store.list()))
}

pub async fn create_tenant(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    Json(request): Json<CreateTenantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&context)?;

    let result = match request.into_tenant() {
        Ok(tenant) => state.store.create(tenant).await,
        Err(e) => Err(e),
    };
    state.record_mutation("create", &result);

    let tenant = result?;
    info!("Created tenant '{}' ({})", tenant.slug, tenant.id);
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    Path(slug): Path<String>,
) -> Result<Json<TenantConfig>, ApiError> {
    require_admin(&context)?;
    state
        .store
        .get_by_slug(&slug)
        .map(Json)
        .ok_or(ApiError::TenantNotFound(slug))
}

/// Delete a tenant. Deleting an unknown slug is a no-op.
pub async fn delete_tenant(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&context)?;

    let result = state.store.delete(&slug).await;
    state.record_mutation("delete", &result);

    let deleted = result?;
    if deleted {
        info!("Deleted tenant '{}'", slug);
    }
    Ok(Json(serde_json::json!({ "slug": slug, "deleted": deleted })))
}
