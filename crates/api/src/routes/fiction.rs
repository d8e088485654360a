//! Route definitions for the `/f` resource.
//!
//! Chapters and favorites hang off `/f/{fiction_id}`. Path parameter names
//! are shared across routes so static segments (`c`, `u`, `d`, `fav`) can
//! sit next to `{chapter_id}` at the same depth.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{chapter, favorite, fiction};
use crate::state::AppState;

/// Routes mounted at `/f`.
///
/// ```text
/// GET    /                                  -> fiction::list
/// POST   /c                                 -> fiction::create
/// GET    /{fiction_id}                      -> fiction::get_by_id
/// PUT    /{fiction_id}/u                    -> fiction::update
/// DELETE /{fiction_id}/d                    -> fiction::delete
/// POST   /{fiction_id}/c                    -> chapter::create
///
/// POST   /{fiction_id}/fav                  -> favorite::add
/// DELETE /{fiction_id}/fav/rmv              -> favorite::remove
/// GET    /{fiction_id}/fav/status           -> favorite::status
///
/// GET    /{fiction_id}/{chapter_id}         -> chapter::get_by_id
/// PUT    /{fiction_id}/{chapter_id}/u       -> chapter::update
/// DELETE /{fiction_id}/{chapter_id}/d       -> chapter::delete
/// POST   /{fiction_id}/{chapter_id}/img     -> chapter::upload_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fiction::list))
        .route("/c", post(fiction::create))
        .route("/{fiction_id}", get(fiction::get_by_id))
        .route("/{fiction_id}/u", put(fiction::update))
        .route("/{fiction_id}/d", delete(fiction::delete))
        .route("/{fiction_id}/c", post(chapter::create))
        .route("/{fiction_id}/fav", post(favorite::add))
        .route("/{fiction_id}/fav/rmv", delete(favorite::remove))
        .route("/{fiction_id}/fav/status", get(favorite::status))
        .route("/{fiction_id}/{chapter_id}", get(chapter::get_by_id))
        .route("/{fiction_id}/{chapter_id}/u", put(chapter::update))
        .route("/{fiction_id}/{chapter_id}/d", delete(chapter::delete))
        .route("/{fiction_id}/{chapter_id}/img", post(chapter::upload_image))
}
