//! Handlers for favoriting fictions. The user is always the session user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fictsu_core::error::CoreError;
use fictsu_core::types::DbId;
use fictsu_db::models::favorite::{AddFavoriteOutcome, FavoriteStatus};
use fictsu_db::repositories::FavoriteRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::state::AppState;

/// Body for add/remove: the new state plus a human-readable message.
#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub is_favorited: bool,
    pub message: &'static str,
}

/// POST /api/f/{fiction_id}/fav
///
/// A second add for the same pair is a 409, not a no-op.
pub async fn add(
    State(state): State<AppState>,
    user: SessionUser,
    Path(fiction_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    match FavoriteRepo::add(&state.pool, user.id, fiction_id).await? {
        AddFavoriteOutcome::Added => {
            tracing::info!(fiction_id, user_id = user.id, "Fiction favorited");
            Ok((
                StatusCode::CREATED,
                Json(FavoriteResponse {
                    is_favorited: true,
                    message: "Fiction added to favorites",
                }),
            ))
        }
        AddFavoriteOutcome::AlreadyFavorited => Err(AppError::Core(CoreError::Conflict(
            "Fiction is already in your favorites".into(),
        ))),
        AddFavoriteOutcome::FictionMissing => Err(AppError::Core(CoreError::NotFound {
            entity: "Fiction",
            id: fiction_id,
        })),
    }
}

/// DELETE /api/f/{fiction_id}/fav/rmv
pub async fn remove(
    State(state): State<AppState>,
    user: SessionUser,
    Path(fiction_id): Path<DbId>,
) -> AppResult<Json<FavoriteResponse>> {
    let removed = FavoriteRepo::remove(&state.pool, user.id, fiction_id).await?;
    if !removed {
        return Err(AppError::NotFound(
            "Fiction not found in your favorites".into(),
        ));
    }

    tracing::info!(fiction_id, user_id = user.id, "Fiction unfavorited");
    Ok(Json(FavoriteResponse {
        is_favorited: false,
        message: "Fiction removed from favorites",
    }))
}

/// GET /api/f/{fiction_id}/fav/status
pub async fn status(
    State(state): State<AppState>,
    user: SessionUser,
    Path(fiction_id): Path<DbId>,
) -> AppResult<Json<FavoriteStatus>> {
    let is_favorited = FavoriteRepo::exists(&state.pool, user.id, fiction_id).await?;
    Ok(Json(FavoriteStatus { is_favorited }))
}
