use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{blocking, ApiContext};
use crate::fetch;
use crate::models::Region;

/// `GET /api/regions` — regions ordered by name.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Region>>, ApiError> {
    let store = ctx.store.clone();
    let regions = blocking(move || fetch::fetch_regions(store.as_ref())).await?;
    Ok(Json(regions))
}
