//! Dashboard endpoints.
//!
//! - `POST /api/dashboard/region` — select a region and start loading
//! - `GET /api/dashboard` — current panel states

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::{refresh_region, DashboardSnapshot, RegionTicket};

#[derive(Deserialize)]
pub struct SelectRegionRequest {
    pub region_id: String,
}

/// Requires a session. Loading continues in the background; poll
/// `GET /api/dashboard` for results.
pub async fn select_region(
    State(ctx): State<ApiContext>,
    Json(request): Json<SelectRegionRequest>,
) -> Result<(StatusCode, Json<RegionTicket>), ApiError> {
    let ticket = ctx.session.select_region(&request.region_id)?;

    tokio::spawn(refresh_region(
        ctx.dashboard.clone(),
        ctx.store.clone(),
        ticket.clone(),
    ));

    Ok((StatusCode::ACCEPTED, Json(ticket)))
}

pub async fn snapshot(State(ctx): State<ApiContext>) -> Result<Json<DashboardSnapshot>, ApiError> {
    ctx.session.current().ok_or(ApiError::Unauthorized)?;
    Ok(Json(ctx.dashboard.snapshot()))
}
