//! Chronic disease reports and the regional summary, both produced by the
//! external analysis service.
//!
//! - `GET /api/regions/:id/chronic-disease` — persisted report or `null`
//! - `POST /api/regions/:id/chronic-disease` — generate a new report
//! - `POST /api/regions/:id/community-health` — free-form summary

use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::{blocking, ApiContext};
use crate::dashboard::generate_chronic;
use crate::fetch;
use crate::models::ChronicDiseaseAnalysis;

pub async fn existing(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<Option<ChronicDiseaseAnalysis>>, ApiError> {
    let store = ctx.store.clone();
    let analysis =
        blocking(move || fetch::fetch_existing_analysis(store.as_ref(), &region_id)).await?;
    Ok(Json(analysis))
}

pub async fn generate(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<ChronicDiseaseAnalysis>, ApiError> {
    let analysis = generate_chronic(&ctx.dashboard, ctx.analysis.clone(), &region_id).await?;
    Ok(Json(analysis))
}

pub async fn community_health(
    State(ctx): State<ApiContext>,
    Path(region_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let service = ctx.analysis.clone();
    let summary = blocking(move || service.community_health(&region_id)).await?;
    Ok(Json(summary))
}
