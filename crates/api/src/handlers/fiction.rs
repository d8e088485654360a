//! Handlers for the `/f` fiction resource.
//!
//! Create and edit take multipart forms so a cover image can ride along
//! with the text fields.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use fictsu_core::error::CoreError;
use fictsu_core::fiction::{
    cover_object_path, parse_genre_ids, validate_image, validate_len, validate_title,
    FictionStatus, MAX_SHORT_FIELD_LEN,
};
use fictsu_core::types::DbId;
use fictsu_db::models::fiction::{CreateFiction, Fiction, FictionDetail, UpdateFiction};
use fictsu_db::repositories::{ChapterRepo, FictionRepo, GenreRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::form::{FormData, UploadedFile};
use crate::middleware::ownership::require_fiction_owner;
use crate::middleware::session::SessionUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /api/f
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Fiction>>> {
    let fictions = FictionRepo::list(&state.pool).await?;
    Ok(Json(fictions))
}

/// GET /api/f/{fiction_id}
///
/// Loads the fiction first; genres and chapters are then fetched
/// concurrently and either failure fails the request.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(fiction_id): Path<DbId>,
) -> AppResult<Json<FictionDetail>> {
    let fiction = FictionRepo::find_by_id(&state.pool, fiction_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Fiction",
            id: fiction_id,
        }))?;

    let (genres, chapters) = futures::try_join!(
        GenreRepo::list_by_fiction(&state.pool, fiction_id),
        ChapterRepo::list_by_fiction(&state.pool, fiction_id),
    )?;

    Ok(Json(FictionDetail {
        fiction,
        genres,
        chapters,
    }))
}

/// POST /api/f/c
///
/// Multipart fields: `title` and `status` (required), `subtitle`, `author`,
/// `artist`, `synopsis`, `genre_ids` (comma-separated) and an optional
/// `cover` file. The contributor is always the session user.
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Fiction>)> {
    let mut form = FormData::read(&mut multipart).await?;

    let title = form.text_owned("title").unwrap_or_default();
    validate_title(&title)?;
    let status: FictionStatus = form
        .text("status")
        .ok_or_else(|| CoreError::Validation("Field 'status' is required".into()))?
        .parse()?;
    let genre_ids = parse_genre_ids(form.text("genre_ids").unwrap_or(""))?;

    let input = CreateFiction {
        contributor_id: user.id,
        contributor_name: user.name.clone(),
        title,
        subtitle: form.text_owned("subtitle").unwrap_or_default(),
        author: form.text_owned("author").unwrap_or_default(),
        artist: form.text_owned("artist").unwrap_or_default(),
        status,
        synopsis: form.text_owned("synopsis").unwrap_or_default(),
    };
    validate_short_fields(
        Some(input.subtitle.as_str()),
        Some(input.author.as_str()),
        Some(input.artist.as_str()),
    )?;

    let cover = form.take_file("cover");
    if let Some(file) = &cover {
        validate_image(&file.content_type, file.data.len())?;
    }

    let mut fiction = FictionRepo::create(&state.pool, &input).await?;
    if !genre_ids.is_empty() {
        GenreRepo::set_for_fiction(&state.pool, fiction.id, &genre_ids).await?;
    }
    tracing::info!(fiction_id = fiction.id, user_id = user.id, "Fiction created");

    // The fiction stays even if the cover cannot be stored or recorded; the
    // client can retry through edit.
    if let Some(file) = cover {
        match upload_cover(&state, fiction.id, file).await {
            Ok(url) => match FictionRepo::set_cover(&state.pool, fiction.id, &url).await {
                Ok(true) => fiction.cover = url,
                Ok(false) => {
                    tracing::warn!(
                        fiction_id = fiction.id,
                        "Fiction vanished before its cover could be recorded"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        fiction_id = fiction.id,
                        error = %e,
                        "Recording cover failed, fiction created without cover"
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    fiction_id = fiction.id,
                    error = %e,
                    "Cover upload failed, fiction created without cover"
                );
            }
        }
    }

    Ok((StatusCode::CREATED, Json(fiction)))
}

/// PUT /api/f/{fiction_id}/u
///
/// Same fields as create, all optional. A field present in the form is
/// written even when empty; a new `cover` file counts as a field.
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    Path(fiction_id): Path<DbId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    require_fiction_owner(&state, fiction_id, user.id, "edit this fiction").await?;

    let mut form = FormData::read(&mut multipart?).await?;

    let mut patch = UpdateFiction {
        title: form.text_owned("title"),
        subtitle: form.text_owned("subtitle"),
        author: form.text_owned("author"),
        artist: form.text_owned("artist"),
        status: form
            .text("status")
            .map(str::parse::<FictionStatus>)
            .transpose()?,
        synopsis: form.text_owned("synopsis"),
        cover: None,
    };
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    validate_short_fields(
        patch.subtitle.as_deref(),
        patch.author.as_deref(),
        patch.artist.as_deref(),
    )?;

    let cover = form.take_file("cover");
    if patch.is_empty() && cover.is_none() {
        return Err(AppError::NoFieldsProvided);
    }
    if let Some(file) = cover {
        validate_image(&file.content_type, file.data.len())?;
        patch.cover = Some(upload_cover(&state, fiction_id, file).await?);
    }

    let rows = FictionRepo::update(&state.pool, fiction_id, &patch).await?;
    if rows == 0 {
        // Deleted between the ownership check and the update.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Fiction",
            id: fiction_id,
        }));
    }

    tracing::info!(fiction_id, user_id = user.id, "Fiction updated");
    Ok(Json(MessageResponse::new("Fiction updated successfully")))
}

/// DELETE /api/f/{fiction_id}/d
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(fiction_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    require_fiction_owner(&state, fiction_id, user.id, "delete this fiction").await?;

    let deleted = FictionRepo::delete(&state.pool, fiction_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Fiction",
            id: fiction_id,
        }));
    }

    tracing::info!(fiction_id, user_id = user.id, "Fiction deleted");
    Ok(Json(MessageResponse::new("Fiction deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_short_fields(
    subtitle: Option<&str>,
    author: Option<&str>,
    artist: Option<&str>,
) -> Result<(), CoreError> {
    for (field, value) in [("subtitle", subtitle), ("author", author), ("artist", artist)] {
        if let Some(value) = value {
            validate_len(field, value, MAX_SHORT_FIELD_LEN)?;
        }
    }
    Ok(())
}

/// Store a cover under `<cover_path><fiction_id>` and return its public URL.
async fn upload_cover(
    state: &AppState,
    fiction_id: DbId,
    file: UploadedFile,
) -> AppResult<String> {
    let storage = &state.config.storage;
    let path = cover_object_path(&storage.cover_path, fiction_id);
    let url = state
        .storage
        .upload(file.data, &file.content_type, &path, storage.timeout)
        .await?;
    tracing::debug!(fiction_id, %url, "Cover uploaded");
    Ok(url)
}
