//! Handlers for chapters, nested under `/f/{fiction_id}`.
//!
//! Every mutation is guarded on the parent fiction's contributor.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use fictsu_core::error::CoreError;
use fictsu_core::fiction::{chapter_image_object_path, validate_image, validate_title};
use fictsu_core::types::DbId;
use fictsu_db::models::chapter::{Chapter, CreateChapter, UpdateChapter};
use fictsu_db::repositories::ChapterRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::form::FormData;
use crate::middleware::ownership::require_fiction_owner;
use crate::middleware::session::SessionUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Response body for a stored chapter image.
#[derive(Debug, Serialize)]
pub struct ImageUrlResponse {
    pub url: String,
}

fn chapter_not_found(chapter_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Chapter",
        id: chapter_id,
    })
}

/// GET /api/f/{fiction_id}/{chapter_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((fiction_id, chapter_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Chapter>> {
    let chapter = ChapterRepo::find(&state.pool, fiction_id, chapter_id)
        .await?
        .ok_or_else(|| chapter_not_found(chapter_id))?;
    Ok(Json(chapter))
}

/// POST /api/f/{fiction_id}/c
///
/// The new chapter's id is one above the fiction's current highest id.
/// The body is only looked at once the requester is known to own the
/// fiction.
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    Path(fiction_id): Path<DbId>,
    payload: Result<Json<CreateChapter>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Chapter>)> {
    require_fiction_owner(
        &state,
        fiction_id,
        user.id,
        "create chapters for this fiction",
    )
    .await?;
    let Json(input) = payload?;

    validate_title(&input.title)?;
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let chapter = ChapterRepo::create(&state.pool, fiction_id, &input).await?;
    tracing::info!(
        fiction_id,
        chapter_id = chapter.id,
        user_id = user.id,
        "Chapter created"
    );
    Ok((StatusCode::CREATED, Json(chapter)))
}

/// PUT /api/f/{fiction_id}/{chapter_id}/u
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    Path((fiction_id, chapter_id)): Path<(DbId, DbId)>,
    payload: Result<Json<UpdateChapter>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    require_fiction_owner(
        &state,
        fiction_id,
        user.id,
        "edit chapters of this fiction",
    )
    .await?;
    let Json(input) = payload?;

    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let rows = ChapterRepo::update(&state.pool, fiction_id, chapter_id, &input).await?;
    if rows == 0 {
        return Err(chapter_not_found(chapter_id));
    }

    tracing::info!(fiction_id, chapter_id, user_id = user.id, "Chapter updated");
    Ok(Json(MessageResponse::new("Chapter updated successfully")))
}

/// DELETE /api/f/{fiction_id}/{chapter_id}/d
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path((fiction_id, chapter_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    require_fiction_owner(
        &state,
        fiction_id,
        user.id,
        "delete chapters of this fiction",
    )
    .await?;

    let deleted = ChapterRepo::delete(&state.pool, fiction_id, chapter_id).await?;
    if !deleted {
        return Err(chapter_not_found(chapter_id));
    }

    tracing::info!(fiction_id, chapter_id, user_id = user.id, "Chapter deleted");
    Ok(Json(MessageResponse::new("Chapter deleted successfully")))
}

/// POST /api/f/{fiction_id}/{chapter_id}/img
///
/// Accepts a multipart form with a required `image` file, stores it under
/// the chapter's prefix and returns its public URL. The chapter text is not
/// modified; the client embeds the URL itself.
pub async fn upload_image(
    State(state): State<AppState>,
    user: SessionUser,
    Path((fiction_id, chapter_id)): Path<(DbId, DbId)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ImageUrlResponse>)> {
    require_fiction_owner(
        &state,
        fiction_id,
        user.id,
        "upload images for this fiction",
    )
    .await?;

    if !ChapterRepo::exists(&state.pool, fiction_id, chapter_id).await? {
        return Err(chapter_not_found(chapter_id));
    }

    let mut form = FormData::read(&mut multipart?).await?;
    let file = form
        .take_file("image")
        .ok_or_else(|| AppError::BadRequest("Missing required 'image' field".into()))?;
    validate_image(&file.content_type, file.data.len())?;

    let storage = &state.config.storage;
    let unique = uuid::Uuid::new_v4().simple().to_string();
    let path =
        chapter_image_object_path(&storage.chapter_image_path, fiction_id, chapter_id, &unique);
    let url = state
        .storage
        .upload(file.data, &file.content_type, &path, storage.timeout)
        .await?;

    tracing::info!(fiction_id, chapter_id, user_id = user.id, %url, "Chapter image uploaded");
    Ok((StatusCode::CREATED, Json(ImageUrlResponse { url })))
}
