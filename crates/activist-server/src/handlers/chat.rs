//! Volunteer chat endpoint for tenant sites

use activist_egress::system_instruction_for;
use activist_routing::RouteContext;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;

/// Longest accepted visitor message, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Extension(context): Extension<RouteContext>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let RouteContext::Public { tenant } = context else {
        return Err(ApiError::NotFound);
    };
    let Some(assistant) = state.chat.as_ref() else {
        return Err(ApiError::NotFound);
    };

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::Invalid("message must not be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::Invalid(format!(
            "message must be at most {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    let instruction = system_instruction_for(&tenant.name, &tenant.description);
    let reply = assistant.reply(message, &instruction).await;
    Ok(Json(ChatResponse { reply }))
}
