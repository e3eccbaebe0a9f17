//! HTTP API.
//!
//! Serves region analytics, the dashboard, analysis-service pass-through
//! and the session context as JSON under `/api/`. `api_router()` returns
//! a `Router` that can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiServerInfo};
pub use types::ApiContext;
