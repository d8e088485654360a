use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /storyline/c   -> create_storyline
/// POST /char/c        -> create_character
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/storyline/c", post(ai::create_storyline))
        .route("/char/c", post(ai::create_character))
}
