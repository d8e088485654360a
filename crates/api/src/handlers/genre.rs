use axum::extract::State;
use axum::Json;
use fictsu_db::models::genre::Genre;
use fictsu_db::repositories::GenreRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/genres
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = GenreRepo::list(&state.pool).await?;
    Ok(Json(genres))
}
