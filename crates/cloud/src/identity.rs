//! OAuth2 login with a third-party identity provider.
//!
//! The flow is the standard authorization-code grant:
//! 1. Redirect the browser to [`IdentityProvider::authorize_url`] with an
//!    opaque `state` value.
//! 2. The provider redirects back with `code` and `state`.
//! 3. [`IdentityProvider::exchange_code`] trades the code for an access
//!    token and fetches the user's profile.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const GOOGLE_SCOPES: &str = "openid email profile";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider refused the code or the token.
    #[error("Identity provider returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Identity request timed out after {0:?}")]
    Timeout(Duration),

    /// The profile lacks the stable subject identifier.
    #[error("Identity provider returned a profile without a subject")]
    MissingSubject,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The profile fields Fictsu keeps about an external account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    /// Stable account id at the provider.
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name used in routes, e.g. `google`.
    fn name(&self) -> &str;

    /// URL to send the browser to for consent.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the user's profile.
    async fn exchange_code(
        &self,
        code: &str,
        timeout: Duration,
    ) -> Result<ProviderUser, IdentityError>;
}

// ---------------------------------------------------------------------------
// Google implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    picture: String,
}

impl GoogleUserInfo {
    fn into_provider_user(self) -> Result<ProviderUser, IdentityError> {
        if self.sub.is_empty() {
            return Err(IdentityError::MissingSubject);
        }
        Ok(ProviderUser {
            user_id: self.sub,
            name: self.name,
            email: self.email,
            avatar_url: self.picture,
        })
    }
}

/// [`IdentityProvider`] for Google accounts.
pub struct GoogleProvider {
    client: reqwest::Client,
    settings: GoogleSettings,
}

impl GoogleProvider {
    pub fn new(settings: GoogleSettings) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, settings })
    }

    async fn fetch_token(&self, code: &str, timeout: Duration) -> Result<String, IdentityError> {
        let params = [
            ("code", code),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .timeout(timeout)
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IdentityError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json::<TokenResponse>().await?.access_token)
    }

    async fn fetch_profile(
        &self,
        access_token: &str,
        timeout: Duration,
    ) -> Result<ProviderUser, IdentityError> {
        let response = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .timeout(timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IdentityError::HttpStatus(response.status().as_u16()));
        }
        response.json::<GoogleUserInfo>().await?.into_provider_user()
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.callback_url.as_str()),
            ("response_type", "code"),
            ("scope", GOOGLE_SCOPES),
            ("access_type", "online"),
            ("state", state),
        ];
        match Url::parse_with_params(GOOGLE_AUTH_URL, &params) {
            Ok(url) => url.into(),
            // The base URL is a constant, so parsing cannot fail.
            Err(_) => GOOGLE_AUTH_URL.to_string(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        timeout: Duration,
    ) -> Result<ProviderUser, IdentityError> {
        // One budget for both round trips.
        let exchange = async {
            let token = self.fetch_token(code, timeout).await?;
            self.fetch_profile(&token, timeout).await
        };
        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| IdentityError::Timeout(timeout))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn provider() -> GoogleProvider {
        GoogleProvider::new(GoogleSettings {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            callback_url: "http://localhost:8080/api/auth/google/callback".into(),
        })
        .unwrap()
    }

    #[test]
    fn authorize_url_carries_client_and_state() {
        let url = Url::parse(&provider().authorize_url("st/a te")).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("client_id").as_deref(), Some("client-123"));
        assert_eq!(get("state").as_deref(), Some("st/a te"));
        assert_eq!(get("response_type").as_deref(), Some("code"));
        assert_eq!(
            get("redirect_uri").as_deref(),
            Some("http://localhost:8080/api/auth/google/callback")
        );
    }

    #[test]
    fn userinfo_maps_to_provider_user() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"sub":"1099","name":"Ann","email":"ann@example.com",
                "picture":"https://pic.example/a.png","email_verified":true}"#,
        )
        .unwrap();
        let user = info.into_provider_user().unwrap();
        assert_eq!(
            user,
            ProviderUser {
                user_id: "1099".into(),
                name: "Ann".into(),
                email: "ann@example.com".into(),
                avatar_url: "https://pic.example/a.png".into(),
            }
        );
    }

    #[test]
    fn userinfo_without_subject_is_rejected() {
        let info: GoogleUserInfo = serde_json::from_str(r#"{"name":"Ann"}"#).unwrap();
        assert_matches!(info.into_provider_user(), Err(IdentityError::MissingSubject));
    }

    #[test]
    fn provider_name() {
        assert_eq!(provider().name(), "google");
    }
}
