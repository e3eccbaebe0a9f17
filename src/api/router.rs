//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! Extension → CORS → Audit logger → Handler

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints::{analytics, assistant, chronic, dashboard, health, patients, regions, session};
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let routes = Router::new()
        .route("/health", get(health::check))
        .route("/regions", get(regions::list))
        .route("/regions/:id/age", get(analytics::age))
        .route("/regions/:id/income", get(analytics::income))
        .route("/regions/:id/bmi", get(analytics::bmi))
        .route("/regions/:id/vaccination", get(analytics::vaccination))
        .route(
            "/regions/:id/chronic-disease",
            get(chronic::existing).post(chronic::generate),
        )
        .route(
            "/regions/:id/community-health",
            post(chronic::community_health),
        )
        .route(
            "/patients/:id/analysis",
            get(patients::existing).post(patients::generate),
        )
        .route("/dashboard", get(dashboard::snapshot))
        .route("/dashboard/region", post(dashboard::select_region))
        .route("/assistant/chat", post(assistant::chat))
        .route(
            "/session",
            get(session::current)
                .post(session::sign_in)
                .delete(session::sign_out),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors)
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx));

    Router::new().nest("/api", routes)
}
