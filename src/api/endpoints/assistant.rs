use axum::extract::State;
use axum::Json;

use crate::analysis_service::{ChatReply, ChatRequest};
use crate::api::error::ApiError;
use crate::api::types::{blocking, ApiContext};

/// `POST /api/assistant/chat` — forward a question to the AI assistant.
pub async fn chat(
    State(ctx): State<ApiContext>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    request.validate()?;

    tracing::info!(
        history = request.conversation.len(),
        option = %request.option,
        "Assistant question"
    );

    let service = ctx.analysis.clone();
    let reply = blocking(move || service.chat(&request)).await?;
    Ok(Json(reply))
}
