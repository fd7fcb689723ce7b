//! Full-page templates

use activist_core::TenantConfig;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::error;

/// Values echoed back into the create form after a failed submit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// One tenant as listed on the dashboard and landing page
pub struct TenantRow {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub host: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub block_count: usize,
}

impl TenantRow {
    pub fn new(tenant: &TenantConfig, root_host: &str) -> Self {
        Self {
            name: tenant.name.clone(),
            slug: tenant.slug.to_string(),
            description: tenant.description.clone(),
            host: format!("{}.{}", tenant.slug, root_host),
            primary: tenant.theme.primary.clone(),
            secondary: tenant.theme.secondary.clone(),
            accent: tenant.theme.accent.clone(),
            block_count: tenant.landing_page_blocks.len(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct DashboardTemplate {
    pub tenants: Vec<TenantRow>,
    pub root_host: String,
    /// Where the tenant map came from at startup
    pub source: String,
    /// Empty when there is nothing to report
    pub error: String,
    pub form: TenantForm,
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub admin_host: String,
    pub root_host: String,
    pub sites: Vec<TenantRow>,
}

#[derive(Template)]
#[template(path = "tenant.html")]
pub struct TenantTemplate {
    pub name: String,
    /// Inline CSS custom properties for the tenant palette
    pub style: String,
    /// Pre-rendered main content
    pub body: String,
    pub chat_enabled: bool,
}

#[derive(Template)]
#[template(path = "section.html")]
pub struct SectionTemplate {
    pub title: String,
    pub text: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub root_host: String,
}

/// Render a page template with `status`, or a bare 500 if rendering fails.
pub fn render_page<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render page template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activist_core::TenantDraft;

    fn tenant() -> TenantConfig {
        let mut tenant = TenantDraft {
            name: "City Bike Initiative".to_string(),
            slug: "city-bike".to_string(),
            description: Some("Safer streets <now>".to_string()),
        }
        .into_tenant()
        .unwrap();
        tenant.normalize();
        tenant
    }

    #[test]
    fn test_tenant_row() {
        let row = TenantRow::new(&tenant(), "activist.com");
        assert_eq!(row.host, "city-bike.activist.com");
        assert_eq!(row.block_count, 1);
        assert_eq!(row.secondary, "#f1f5f9");
    }

    #[test]
    fn test_dashboard_escapes_tenant_text() {
        let html = DashboardTemplate {
            tenants: vec![TenantRow::new(&tenant(), "activist.com")],
            root_host: "activist.com".to_string(),
            source: "seeded".to_string(),
            error: String::new(),
            form: TenantForm::default(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Safer streets &#60;now&#62;") || html.contains("Safer streets &lt;now&gt;"));
        assert!(html.contains("/tenants/city-bike/delete"));
        assert!(!html.contains("alert-error"));
    }

    #[test]
    fn test_dashboard_shows_error_and_keeps_form() {
        let html = DashboardTemplate {
            tenants: Vec::new(),
            root_host: "activist.com".to_string(),
            source: "persisted".to_string(),
            error: "Tenant slug 'x' is already in use".to_string(),
            form: TenantForm {
                name: "X".to_string(),
                slug: "x".to_string(),
                description: String::new(),
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("alert-error"));
        assert!(html.contains("already in use"));
        assert!(html.contains("No sites yet."));
    }

    #[test]
    fn test_tenant_page_carries_style_and_body() {
        let html = TenantTemplate {
            name: "Green Earth".to_string(),
            style: "--color-primary: #16a34a;".to_string(),
            body: "<section class=\"block\">hi</section>".to_string(),
            chat_enabled: false,
        }
        .render()
        .unwrap();

        assert!(html.contains("style=\"--color-primary: #16a34a;\""));
        assert!(html.contains("<section class=\"block\">hi</section>"));
        assert!(!html.contains("chat.js"));
    }

    #[test]
    fn test_render_page_status() {
        let response = render_page(
            StatusCode::NOT_FOUND,
            &NotFoundTemplate {
                root_host: "activist.com".to_string(),
            },
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
