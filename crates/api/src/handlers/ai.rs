//! AI writing helpers: storyline outlines and character reference images.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use fictsu_core::prompt::{
    character_prompt, resolve_image_size, storyline_prompt, validate_message,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::session::SessionUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StorylineRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StorylineResponse {
    pub received_message: String,
}

#[derive(Debug, Deserialize)]
pub struct CharacterRequest {
    pub message: String,
    /// One of the supported sizes; defaults to a square image.
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub image_url: String,
}

/// POST /api/ai/storyline/c
pub async fn create_storyline(
    State(state): State<AppState>,
    user: SessionUser,
    payload: Result<Json<StorylineRequest>, JsonRejection>,
) -> AppResult<Json<StorylineResponse>> {
    let Json(input) = payload?;
    validate_message(&input.message)?;

    let prompt = storyline_prompt(&input.message);
    let received_message = state
        .ai
        .generate_text(&prompt, state.config.ai.timeout)
        .await?;

    tracing::info!(user_id = user.id, "Storyline generated");
    Ok(Json(StorylineResponse { received_message }))
}

/// POST /api/ai/char/c
pub async fn create_character(
    State(state): State<AppState>,
    user: SessionUser,
    payload: Result<Json<CharacterRequest>, JsonRejection>,
) -> AppResult<Json<CharacterResponse>> {
    let Json(input) = payload?;
    validate_message(&input.message)?;
    let size = resolve_image_size(input.size.as_deref())?;

    let prompt = character_prompt(&input.message);
    let image_url = state
        .ai
        .generate_image(&prompt, size, state.config.ai.timeout)
        .await?;

    tracing::info!(user_id = user.id, size, "Character image generated");
    Ok(Json(CharacterResponse { image_url }))
}
