//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::analysis_service::AnalysisService;
use crate::backend::RecordStore;
use crate::dashboard::Dashboard;
use crate::error::FetchError;
use crate::session::SessionContext;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn RecordStore>,
    pub analysis: Arc<dyn AnalysisService>,
    pub dashboard: Arc<Dashboard>,
    pub session: Arc<SessionContext>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn RecordStore>, analysis: Arc<dyn AnalysisService>) -> Self {
        let dashboard = Arc::new(Dashboard::new());
        let session = Arc::new(SessionContext::new(dashboard.clone()));
        Self {
            store,
            analysis,
            dashboard,
            session,
        }
    }
}

/// Run a blocking backend or service call off the async runtime.
pub async fn blocking<T, F>(f: F) -> Result<T, FetchError>
where
    F: FnOnce() -> Result<T, FetchError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
