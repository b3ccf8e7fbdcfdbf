//! Referer/Origin allowlist for the API routes.

use crate::server::AppContext;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Reject requests whose Referer (or, failing that, Origin) host is not in
/// `server.allowed_domains`.
pub async fn allowed_domain_middleware(
    State(ctx): State<AppContext>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_allowed(request.headers(), &ctx.config.server.allowed_domains) {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request from disallowed origin");
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "Forbidden: Access is denied." })),
    )
        .into_response()
}

/// Referer wins over Origin; a request carrying neither is denied.
pub fn is_allowed(headers: &HeaderMap, allowed: &[String]) -> bool {
    let source = headers
        .get(header::REFERER)
        .or_else(|| headers.get(header::ORIGIN))
        .and_then(|v| v.to_str().ok());

    source
        .and_then(host_of)
        .is_some_and(|host| allowed.iter().any(|d| d.eq_ignore_ascii_case(&host)))
}

fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()?
        .host_str()
        .map(str::to_string)
}
