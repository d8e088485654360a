pub mod ai;
pub mod auth;
pub mod fiction;
pub mod genre;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /f                                       list fictions (public)
/// /f/c                                     create fiction (session)
/// /f/{fiction_id}                          fiction with genres and chapters
/// /f/{fiction_id}/u, /d                    edit, delete (contributor)
/// /f/{fiction_id}/c                        create chapter (contributor)
/// /f/{fiction_id}/fav, /fav/rmv, /fav/status
///                                          favorites (session)
/// /f/{fiction_id}/{chapter_id}             chapter (public)
/// /f/{fiction_id}/{chapter_id}/u, /d, /img edit, delete, image (contributor)
///
/// /genres                                  list genres (public)
///
/// /user                                    profile (session)
///
/// /auth/logout                             clear session
/// /auth/{provider}                         start OAuth login
/// /auth/{provider}/callback                finish OAuth login
///
/// /ai/storyline/c                          storyline outline (session)
/// /ai/char/c                               character image (session)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/f", fiction::router())
        .nest("/genres", genre::router())
        .nest("/user", user::router())
        .nest("/auth", auth::router())
        .nest("/ai", ai::router())
}
