//! Per-patient analysis.
//!
//! - `GET /api/patients/:id/analysis` — persisted analysis or `null`
//! - `POST /api/patients/:id/analysis` — generate via the analysis service

use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::{blocking, ApiContext};
use crate::fetch;
use crate::models::PatientAnalysis;

pub async fn existing(
    State(ctx): State<ApiContext>,
    Path(visit_patient_id): Path<String>,
) -> Result<Json<Option<Value>>, ApiError> {
    let store = ctx.store.clone();
    let analysis =
        blocking(move || fetch::fetch_patient_analysis(store.as_ref(), &visit_patient_id)).await?;
    Ok(Json(analysis))
}

pub async fn generate(
    State(ctx): State<ApiContext>,
    Path(visit_patient_id): Path<String>,
) -> Result<Json<PatientAnalysis>, ApiError> {
    let service = ctx.analysis.clone();
    tracing::info!(visit_patient_id = %visit_patient_id, "Patient analysis requested");
    let analysis = blocking(move || service.patient_analysis(&visit_patient_id)).await?;
    Ok(Json(analysis))
}
