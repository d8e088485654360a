use std::time::Duration;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All optional fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Session signing and cookie settings.
    pub session: SessionConfig,
    pub oauth: OAuthConfig,
    pub ai: AiConfig,
    pub storage: StorageConfig,
}

/// OAuth client registration with the identity provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    /// Origin the login popup posts its result to.
    pub front_end_url: String,
    /// Budget for the code exchange round trips.
    pub timeout: Duration,
}

/// AI provider credentials.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// Object storage location and key prefixes.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub public_base_url: String,
    /// Static HMAC key pair; when unset the default credential chain is used.
    pub access_key: Option<(String, String)>,
    pub timeout: Duration,
    /// Prefix for cover objects (default: `covers/`).
    pub cover_path: String,
    /// Prefix for chapter image objects (default: `chapters/`).
    pub chapter_image_path: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                          |
    /// |---------------------------|--------------------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                                        |
    /// | `PORT`                    | `8080`                                           |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`                          |
    /// | `REQUEST_TIMEOUT_SECS`    | `60`                                             |
    /// | `CLIENT_ID`               | required                                         |
    /// | `CLIENT_SECRET`           | required                                         |
    /// | `CLIENT_CALLBACK_URL`     | `http://localhost:8080/api/auth/google/callback` |
    /// | `FRONT_END_URL`           | `http://localhost:3000`                          |
    /// | `OAUTH_TIMEOUT_SECS`      | `15`                                             |
    /// | `OPENAI_KEY`              | required                                         |
    /// | `OPENAI_ORG_ID`           | unset                                            |
    /// | `OPENAI_PROJ_ID`          | unset                                            |
    /// | `OPENAI_BASE_URL`         | `https://api.openai.com/v1`                      |
    /// | `AI_TIMEOUT_SECS`         | `60`                                             |
    /// | `BUCKET_NAME`             | required                                         |
    /// | `STORAGE_ENDPOINT`        | `https://storage.googleapis.com`                 |
    /// | `STORAGE_REGION`          | `auto`                                           |
    /// | `STORAGE_PUBLIC_BASE_URL` | `https://storage.googleapis.com`                 |
    /// | `STORAGE_ACCESS_KEY_ID`   | unset                                            |
    /// | `STORAGE_SECRET_KEY`      | unset                                            |
    /// | `STORAGE_TIMEOUT_SECS`    | `30`                                             |
    /// | `COVER_PATH`              | `covers/`                                        |
    /// | `CHAPTER_IMAGE_PATH`      | `chapters/`                                      |
    ///
    /// Session variables are documented on [`SessionConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let oauth = OAuthConfig {
            client_id: required("CLIENT_ID"),
            client_secret: required("CLIENT_SECRET"),
            callback_url: std::env::var("CLIENT_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api/auth/google/callback".into()),
            front_end_url: std::env::var("FRONT_END_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            timeout: secs("OAUTH_TIMEOUT_SECS", 15),
        };

        let ai = AiConfig {
            api_key: required("OPENAI_KEY"),
            organization: optional("OPENAI_ORG_ID"),
            project: optional("OPENAI_PROJ_ID"),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            timeout: secs("AI_TIMEOUT_SECS", 60),
        };

        let access_key = match (
            optional("STORAGE_ACCESS_KEY_ID"),
            optional("STORAGE_SECRET_KEY"),
        ) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        };

        let storage = StorageConfig {
            bucket: required("BUCKET_NAME"),
            endpoint: std::env::var("STORAGE_ENDPOINT")
                .unwrap_or_else(|_| "https://storage.googleapis.com".into()),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".into()),
            public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://storage.googleapis.com".into()),
            access_key,
            timeout: secs("STORAGE_TIMEOUT_SECS", 30),
            cover_path: std::env::var("COVER_PATH").unwrap_or_else(|_| "covers/".into()),
            chapter_image_path: std::env::var("CHAPTER_IMAGE_PATH")
                .unwrap_or_else(|_| "chapters/".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session: SessionConfig::from_env(),
            oauth,
            ai,
            storage,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
    assert!(!value.trim().is_empty(), "{name} must not be empty");
    value
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secs(name: &str, default: u64) -> Duration {
    let value: u64 = std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid u64"));
    Duration::from_secs(value)
}
