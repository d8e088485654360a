//! OAuth login and logout.
//!
//! Login runs in a popup: the front end opens `/auth/{provider}`, the
//! provider redirects to the callback, and the callback answers with a tiny
//! page that tells `window.opener` the login succeeded and closes itself.

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::Json;
use fictsu_cloud::identity::ProviderUser;
use fictsu_db::models::user::{CreateUser, User};
use fictsu_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::session::{
    clear_cookie, issue_token, oauth_state_cookie, read_cookie, session_cookie,
    OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Query string the provider appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn ensure_provider(state: &AppState, provider: &str) -> AppResult<()> {
    if state.identity.name() != provider {
        return Err(AppError::NotFound(format!(
            "Unknown identity provider '{provider}'"
        )));
    }
    Ok(())
}

/// GET /api/auth/{provider}
///
/// Remembers a random `state` in a short-lived cookie and redirects (303)
/// to the provider's consent page.
pub async fn begin(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> AppResult<Response> {
    ensure_provider(&state, &provider)?;

    let csrf_state = uuid::Uuid::new_v4().simple().to_string();
    let url = state.identity.authorize_url(&csrf_state);
    let cookie = oauth_state_cookie(&csrf_state, &state.config.session);

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(&url)).into_response())
}

/// GET /api/auth/{provider}/callback
///
/// Checks `state`, exchanges `code` for the provider profile, registers the
/// user on first login and sets the session cookie.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> AppResult<Response> {
    ensure_provider(&state, &provider)?;

    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!("Login was not completed: {error}")));
    }

    let expected = read_cookie(&headers, OAUTH_STATE_COOKIE);
    match (expected, params.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(AppError::BadRequest("Invalid OAuth state".into())),
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".into()))?;

    let profile = state
        .identity
        .exchange_code(&code, state.config.oauth.timeout)
        .await?;
    let user = find_or_create_user(&state, profile).await?;

    let token = issue_token(&user, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Failed to sign session: {e}")))?;

    tracing::info!(user_id = user.id, provider = %provider, "User logged in");

    let session = &state.config.session;
    Ok((
        AppendHeaders([
            (SET_COOKIE, session_cookie(&token, session)),
            (SET_COOKIE, clear_cookie(OAUTH_STATE_COOKIE, session)),
        ]),
        Html(login_success_page(&state.config.oauth.front_end_url)),
    )
        .into_response())
}

/// GET /api/auth/logout
///
/// Always succeeds; clears the session cookie whether or not one was sent.
pub async fn logout(
    State(state): State<AppState>,
    user: Option<SessionUser>,
) -> impl IntoResponse {
    if let Some(user) = user {
        tracing::info!(user_id = user.id, "User logged out");
    }
    (
        AppendHeaders([(SET_COOKIE, clear_cookie(SESSION_COOKIE, &state.config.session))]),
        Json(MessageResponse::new("Logged out")),
    )
}

async fn find_or_create_user(state: &AppState, profile: ProviderUser) -> AppResult<User> {
    if let Some(user) = UserRepo::find_by_provider_id(&state.pool, &profile.user_id).await? {
        return Ok(user);
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            user_id: profile.user_id,
            name: profile.name,
            email: profile.email,
            avatar_url: profile.avatar_url,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User registered");
    Ok(user)
}

/// Page that reports the login to the opener window and closes the popup.
fn login_success_page(front_end_url: &str) -> String {
    // A JSON string is a valid JS string literal; `</` must not close the script.
    let target = serde_json::to_string(front_end_url)
        .unwrap_or_else(|_| "\"*\"".into())
        .replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Logging in...</title>
  <script>
    if (window.opener) {{
      window.opener.postMessage("login-success", {target});
    }}
    window.close();
  </script>
</head>
<body>
  <p>Logging in... If this window does not close, please close it manually.</p>
</body>
</html>
"#
    )
}
