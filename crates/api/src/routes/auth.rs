use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET /logout                -> logout
/// GET /{provider}            -> begin
/// GET /{provider}/callback   -> callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logout", get(auth::logout))
        .route("/{provider}", get(auth::begin))
        .route("/{provider}/callback", get(auth::callback))
}
