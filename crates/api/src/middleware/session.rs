//! Session cookie extractor for Axum handlers.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use fictsu_core::error::CoreError;
use fictsu_core::types::DbId;

use crate::auth::session::{read_cookie, validate_token, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the signed `fictsu-session` cookie.
///
/// Use this as an extractor parameter in any handler that requires a
/// logged-in user; the request is rejected with 401 before the handler runs
/// when the cookie is missing, tampered with or expired:
///
/// ```ignore
/// async fn my_handler(user: SessionUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// `Option<SessionUser>` never rejects.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The user's internal database id (from `claims.sub`).
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

fn resolve(parts: &Parts, state: &AppState) -> Result<SessionUser, AppError> {
    let token = read_cookie(&parts.headers, SESSION_COOKIE).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Unauthorized. Please log in first".into(),
        ))
    })?;

    let claims = validate_token(token, &state.config.session).map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired session".into(),
        ))
    })?;

    Ok(SessionUser {
        id: claims.sub,
        name: claims.name,
        email: claims.email,
        avatar_url: claims.avatar_url,
    })
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
    }
}

impl OptionalFromRequestParts<AppState> for SessionUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(resolve(parts, state).ok())
    }
}
