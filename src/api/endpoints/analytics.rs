//! One-shot metric panels for a region, outside the dashboard selection.
//!
//! A successful or empty panel is returned as `200` with its state tag;
//! fetch failures map to error statuses.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{blocking, ApiContext};
use crate::dashboard::{load_panel, PanelState};
use crate::models::Metric;

async fn panel(ctx: ApiContext, metric: Metric, region_id: String) -> Result<Json<PanelState>, ApiError> {
    let store = ctx.store.clone();
    let state = blocking(move || load_panel(store.as_ref(), metric, &region_id)).await?;
    Ok(Json(state))
}

/// `GET /api/regions/:id/age`
pub async fn age(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<PanelState>, ApiError> {
    panel(ctx, Metric::Age, region_id).await
}

/// `GET /api/regions/:id/income`
pub async fn income(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<PanelState>, ApiError> {
    panel(ctx, Metric::Income, region_id).await
}

/// `GET /api/regions/:id/bmi`
pub async fn bmi(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<PanelState>, ApiError> {
    panel(ctx, Metric::Bmi, region_id).await
}

/// `GET /api/regions/:id/vaccination`
pub async fn vaccination(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<PanelState>, ApiError> {
    panel(ctx, Metric::Vaccination, region_id).await
}
