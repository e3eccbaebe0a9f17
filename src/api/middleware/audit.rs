//! Audit logging middleware.
//!
//! Logs every API request with method, path, response status, latency
//! and the signed-in user when there is one.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ApiContext;

/// Log API access for the audit trail.
/// Reads `ApiContext` from request extensions.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user = req
        .extensions()
        .get::<ApiContext>()
        .and_then(|ctx| ctx.session.current())
        .map(|s| format!("{}:{}", s.user.role.as_str(), s.user.user_id));

    let started = Instant::now();
    let response = next.run(req).await;
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status >= 500 {
        tracing::warn!(%method, %path, status, elapsed_ms, user = user.as_deref(), "API access");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, user = user.as_deref(), "API access");
    }

    response
}
