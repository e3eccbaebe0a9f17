//! Session context endpoints.
//!
//! - `GET /api/session` — active session or `null`
//! - `POST /api/session` — record the signed-in identity
//! - `DELETE /api/session` — sign out

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::session::{SessionInfo, SessionUser};

#[derive(Serialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}

pub async fn current(State(ctx): State<ApiContext>) -> Json<Option<SessionInfo>> {
    Json(ctx.session.current())
}

pub async fn sign_in(
    State(ctx): State<ApiContext>,
    Json(user): Json<SessionUser>,
) -> Result<(StatusCode, Json<SessionInfo>), ApiError> {
    let info = ctx.session.sign_in(user)?;
    Ok((StatusCode::CREATED, Json(info)))
}

pub async fn sign_out(State(ctx): State<ApiContext>) -> Json<SignOutResponse> {
    Json(SignOutResponse {
        signed_out: ctx.session.sign_out(),
    })
}
