//! Session tokens and the cookies that carry them.
//!
//! A session is an HS256-signed JWT holding the user's id and display
//! profile. It travels in an `HttpOnly` cookie, so the server keeps no
//! session table: a valid signature and an unexpired `exp` are the whole
//! check.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use fictsu_core::types::DbId;
use fictsu_db::models::user::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "fictsu-session";

/// Cookie holding the OAuth `state` between redirect and callback.
pub const OAUTH_STATE_COOKIE: &str = "fictsu-oauth-state";

/// Lifetime of the OAuth state cookie in seconds.
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

const SECS_PER_DAY: i64 = 86_400;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for session signing and the session cookie.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 key used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in days (default: 30).
    pub max_age_days: i64,
    /// Add the `Secure` attribute to cookies (default: false).
    pub cookie_secure: bool,
}

const DEFAULT_MAX_AGE_DAYS: i64 = 30;

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `SESSION_KEY`           | **yes**  | --      |
    /// | `SESSION_MAX_AGE_DAYS`  | no       | `30`    |
    /// | `SESSION_COOKIE_SECURE` | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `SESSION_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SESSION_KEY").expect("SESSION_KEY must be set in the environment");
        assert!(!secret.is_empty(), "SESSION_KEY must not be empty");

        let max_age_days: i64 = std::env::var("SESSION_MAX_AGE_DAYS")
            .unwrap_or_else(|_| DEFAULT_MAX_AGE_DAYS.to_string())
            .parse()
            .expect("SESSION_MAX_AGE_DAYS must be a valid i64");

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        Self {
            secret,
            max_age_days,
            cookie_secure,
        }
    }

    /// Session lifetime in seconds.
    pub fn max_age_secs(&self) -> i64 {
        self.max_age_days * SECS_PER_DAY
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Sign a session token for `user`.
pub fn issue_token(
    user: &User,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        avatar_url: user.avatar_url.clone(),
        exp: now + config.max_age_secs(),
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

/// `Set-Cookie` value carrying a freshly issued session token.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    build_cookie(
        SESSION_COOKIE,
        token,
        config.max_age_secs(),
        config.cookie_secure,
    )
}

/// `Set-Cookie` value carrying the OAuth `state`.
pub fn oauth_state_cookie(state: &str, config: &SessionConfig) -> String {
    build_cookie(
        OAUTH_STATE_COOKIE,
        state,
        OAUTH_STATE_MAX_AGE_SECS,
        config.cookie_secure,
    )
}

/// `Set-Cookie` value that makes the browser drop cookie `name`.
pub fn clear_cookie(name: &str, config: &SessionConfig) -> String {
    build_cookie(name, "", 0, config.cookie_secure)
}

fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find cookie `name` across every `Cookie` header of a request.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            max_age_days: 30,
            cookie_secure: false,
        }
    }

    fn test_user() -> User {
        User {
            id: 42,
            user_id: "google-42".into(),
            super_user: false,
            name: "Ann".into(),
            email: "ann@example.com".into(),
            avatar_url: "https://pic.example/a.png".into(),
            joined: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let config = test_config();
        let token = issue_token(&test_user(), &config).expect("token issue should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.name, "Ann");
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.exp - claims.iat, 30 * 86_400);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            name: String::new(),
            email: String::new(),
            avatar_url: String::new(),
            exp: now - 300, // well past the default 60-second leeway
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_keys_fail() {
        let config_a = test_config();
        let config_b = SessionConfig {
            secret: "another-secret".into(),
            ..test_config()
        };

        let token = issue_token(&test_user(), &config_a).unwrap();
        assert!(validate_token(&token, &config_b).is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", &test_config());
        assert_eq!(
            cookie,
            "fictsu-session=abc; Path=/; Max-Age=2592000; HttpOnly; SameSite=Lax"
        );

        let secure = SessionConfig {
            cookie_secure: true,
            ..test_config()
        };
        assert_eq!(
            clear_cookie(SESSION_COOKIE, &secure),
            "fictsu-session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(
            COOKIE,
            HeaderValue::from_static("theme=dark; fictsu-session=tok"),
        );
        headers.append(COOKIE, HeaderValue::from_static("fictsu-oauth-state=xyz"));

        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("tok"));
        assert_eq!(read_cookie(&headers, OAUTH_STATE_COOKIE), Some("xyz"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_ignores_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("fictsu-session="));
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), None);
    }
}
