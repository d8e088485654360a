//! Handler for the logged-in user's profile.

use axum::extract::State;
use axum::Json;
use fictsu_core::error::CoreError;
use fictsu_db::models::fiction::{Fiction, FictionWithChapters};
use fictsu_db::models::user::UserProfile;
use fictsu_db::repositories::{ChapterRepo, FictionRepo, UserRepo};
use fictsu_db::DbPool;
use futures::future::try_join_all;

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::state::AppState;

/// GET /api/user
///
/// The user row plus their favorited and contributed fictions, each with
/// its chapters.
pub async fn get_profile(
    State(state): State<AppState>,
    user: SessionUser,
) -> AppResult<Json<UserProfile>> {
    let row = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    let (favorites, contributed) = futures::try_join!(
        FictionRepo::list_favorited_by(&state.pool, user.id),
        FictionRepo::list_by_contributor(&state.pool, user.id),
    )?;

    let (fav_fictions, contributed_fictions) = futures::try_join!(
        with_chapters(&state.pool, favorites),
        with_chapters(&state.pool, contributed),
    )?;

    Ok(Json(UserProfile {
        user: row,
        fav_fictions,
        contributed_fictions,
    }))
}

async fn with_chapters(
    pool: &DbPool,
    fictions: Vec<Fiction>,
) -> Result<Vec<FictionWithChapters>, sqlx::Error> {
    try_join_all(fictions.into_iter().map(|fiction| async move {
        let chapters = ChapterRepo::list_by_fiction(pool, fiction.id).await?;
        Ok::<_, sqlx::Error>(FictionWithChapters { fiction, chapters })
    }))
    .await
}
