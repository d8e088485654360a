//! Shared helpers for the API integration tests.
//!
//! External services are replaced with in-process fakes that record their
//! calls and can be told to fail.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use fictsu_api::auth::session::{issue_token, SessionConfig, SESSION_COOKIE};
use fictsu_api::config::{AiConfig, OAuthConfig, ServerConfig, StorageConfig};
use fictsu_api::router::build_app_router;
use fictsu_api::state::AppState;
use fictsu_cloud::ai::{AiClient, AiError};
use fictsu_cloud::identity::{IdentityError, IdentityProvider, ProviderUser};
use fictsu_cloud::storage::{ObjectStore, StorageError};
use fictsu_db::models::user::{CreateUser, User};
use fictsu_db::repositories::UserRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const FRONT_END_URL: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with safe defaults and short timeouts.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![FRONT_END_URL.to_string()],
        request_timeout_secs: 30,
        session: SessionConfig {
            secret: "integration-test-session-secret".to_string(),
            max_age_days: 30,
            cookie_secure: false,
        },
        oauth: OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            callback_url: "http://localhost:8080/api/auth/google/callback".to_string(),
            front_end_url: FRONT_END_URL.to_string(),
            timeout: Duration::from_secs(5),
        },
        ai: AiConfig {
            api_key: "test-key".to_string(),
            organization: None,
            project: None,
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(5),
        },
        storage: StorageConfig {
            bucket: "fictsu-test".to_string(),
            endpoint: "http://127.0.0.1:1".to_string(),
            region: "auto".to_string(),
            public_base_url: "https://storage.test".to_string(),
            access_key: None,
            timeout: Duration::from_secs(5),
            cover_path: "covers/".to_string(),
            chapter_image_path: "chapters/".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// One recorded upload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub path: String,
    pub content_type: String,
    pub len: usize,
}

#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<StoredObject>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl ObjectStore for FakeStorage {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
        path: &str,
        _timeout: Duration,
    ) -> Result<String, StorageError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Upload("bucket unavailable".into()));
        }
        self.uploads.lock().unwrap().push(StoredObject {
            path: path.to_string(),
            content_type: content_type.to_string(),
            len: data.len(),
        });
        Ok(format!("https://storage.test/fictsu-test/{path}"))
    }
}

#[derive(Default)]
pub struct FakeAi {
    pub prompts: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl AiClient for FakeAi {
    async fn generate_text(&self, prompt: &str, _timeout: Duration) -> Result<String, AiError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AiError::HttpStatus(500));
        }
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("1. Beginning\n2. Middle\n3. End".to_string())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        size: &str,
        _timeout: Duration,
    ) -> Result<String, AiError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AiError::HttpStatus(500));
        }
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(format!("https://images.test/{size}.png"))
    }
}

/// Identity provider named `google` that accepts any code except `bad`.
pub struct FakeIdentity {
    pub profile: ProviderUser,
    pub exchanges: AtomicUsize,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        Self {
            profile: ProviderUser {
                user_id: "google-1234".to_string(),
                name: "Ada Writer".to_string(),
                email: "ada@example.com".to_string(),
                avatar_url: "https://avatars.test/ada.png".to_string(),
            },
            exchanges: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn name(&self) -> &str {
        "google"
    }

    fn authorize_url(&self, state: &str) -> String {
        format!("https://accounts.test/auth?state={state}")
    }

    async fn exchange_code(
        &self,
        code: &str,
        _timeout: Duration,
    ) -> Result<ProviderUser, IdentityError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if code == "bad" {
            return Err(IdentityError::HttpStatus(400));
        }
        Ok(self.profile.clone())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The router plus handles on the fakes behind it.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<ServerConfig>,
    pub storage: Arc<FakeStorage>,
    pub ai: Arc<FakeAi>,
    pub identity: Arc<FakeIdentity>,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router (same middleware stack as production)
/// over the given pool and fresh fakes.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = Arc::new(test_config());
    let storage = Arc::new(FakeStorage::default());
    let ai = Arc::new(FakeAi::default());
    let identity = Arc::new(FakeIdentity::default());

    let state = AppState {
        pool,
        config: Arc::clone(&config),
        storage: storage.clone(),
        ai: ai.clone(),
        identity: identity.clone(),
    };
    let router = build_app_router(state, &config);

    TestApp {
        router,
        config,
        storage,
        ai,
        identity,
    }
}

/// Create a user directly in the database and return it with a `Cookie`
/// header value carrying a valid session for it.
pub async fn login_as(pool: &PgPool, name: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            user_id: format!("google-{name}"),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            avatar_url: String::new(),
        },
    )
    .await
    .expect("user creation should succeed");

    let token = issue_token(&user, &test_config().session).expect("token should sign");
    (user, format!("{SESSION_COOKIE}={token}"))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None, Body::empty()).await
}

pub async fn get_as(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(cookie), None, Body::empty()).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        cookie,
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn put_json_as(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Method::PUT,
        uri,
        Some(cookie),
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn post_as(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(cookie), None, Body::empty()).await
}

pub async fn delete_as(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(cookie), None, Body::empty()).await
}

/// Send a multipart form with `method` (POST or PUT).
pub async fn send_form(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form: MultipartForm,
) -> Response<Body> {
    let (content_type, body) = form.finish();
    send(app, method, uri, cookie, Some(&content_type), Body::from(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "fictsu-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={BOUNDARY}"),
            self.body,
        )
    }
}
