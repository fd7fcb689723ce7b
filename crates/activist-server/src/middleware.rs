//! Route context middleware

use activist_routing::hostname_from_authority;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

/// Response header carrying the resolved route context name
pub const ROUTE_CONTEXT_HEADER: &str = "x-route-context";

/// Hostname a request is addressed to, without port.
///
/// The `Host` header wins; absolute-form request URIs are the fallback.
pub fn request_hostname(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .and_then(hostname_from_authority);

    from_header
        .or_else(|| req.uri().authority().and_then(|a| hostname_from_authority(a.as_str())))
        .map(str::to_string)
}

/// Resolve the route context once per request and store it in extensions.
pub async fn route_context_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let hostname = request_hostname(&req).unwrap_or_default();
    let snapshot = state.store.snapshot();
    let context = state
        .resolver
        .resolve(req.uri().path(), &hostname, &snapshot);

    state.metrics.record_request(context.as_str());
    let label = context.as_str();
    req.extensions_mut().insert(context);

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(ROUTE_CONTEXT_HEADER, HeaderValue::from_static(label));

    response
}

