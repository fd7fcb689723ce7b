//! Activist HTTP server
//!
//! Serves three kinds of host from one process:
//! - the admin host: tenant dashboard and the tenant JSON API
//! - the root host: the public landing page
//! - `<slug>.<root host>`: a tenant's campaign site
//!
//! Health endpoints (`/healthz`, `/readyz`, `/metrics`) answer on every host.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;

pub use app::{AppState, StoreReadiness, build_router};
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use middleware::ROUTE_CONTEXT_HEADER;
