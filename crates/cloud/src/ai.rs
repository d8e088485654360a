//! Text and image generation.
//!
//! [`OpenAiClient`] calls the chat completions endpoint for storylines and
//! the image generation endpoint for character art. Both use the first
//! choice of the response; an empty choice list is an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Chat model used for storyline generation.
pub const TEXT_MODEL: &str = "gpt-4o";

/// Image model used for character generation.
pub const IMAGE_MODEL: &str = "dall-e-3";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for generation failures.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The underlying HTTP request failed (network, DNS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("AI provider returned HTTP {0}")]
    HttpStatus(u16),

    /// The request did not finish within the allotted time.
    #[error("AI request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered successfully but with nothing usable.
    #[error("AI provider returned an empty response")]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AiClient: Send + Sync {
    /// Generate text for a prompt and return the first choice's content.
    async fn generate_text(&self, prompt: &str, timeout: Duration) -> Result<String, AiError>;

    /// Generate one image and return its URL.
    async fn generate_image(
        &self,
        prompt: &str,
        size: &str,
        timeout: Duration,
    ) -> Result<String, AiError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageGeneration {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
}

impl ChatCompletion {
    fn into_text(self) -> Result<String, AiError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}

impl ImageGeneration {
    fn into_url(self) -> Result<String, AiError> {
        self.data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or(AiError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// OpenAI implementation
// ---------------------------------------------------------------------------

/// Credentials and endpoint for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    /// Sent as `OpenAI-Organization` when set.
    pub organization: Option<String>,
    /// Sent as `OpenAI-Project` when set.
    pub project: Option<String>,
    /// e.g. `https://api.openai.com/v1`
    pub base_url: String,
}

/// [`AiClient`] backed by the OpenAI REST API.
pub struct OpenAiClient {
    client: reqwest::Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body with auth headers and decode the JSON response.
    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, AiError> {
        let mut request = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.settings.api_key)
            .timeout(timeout)
            .json(body);
        if let Some(org) = &self.settings.organization {
            request = request.header("OpenAI-Organization", org);
        }
        if let Some(project) = &self.settings.project {
            request = request.header("OpenAI-Project", project);
        }

        let response = request.send().await.map_err(|e| timeout_or(e, timeout))?;
        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status().as_u16()));
        }
        response.json::<T>().await.map_err(|e| timeout_or(e, timeout))
    }
}

fn timeout_or(err: reqwest::Error, timeout: Duration) -> AiError {
    if err.is_timeout() {
        AiError::Timeout(timeout)
    } else {
        AiError::Request(err)
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    async fn generate_text(&self, prompt: &str, timeout: Duration) -> Result<String, AiError> {
        let body = serde_json::json!({
            "model": TEXT_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
        });
        let completion: ChatCompletion = self.post("chat/completions", &body, timeout).await?;
        completion.into_text()
    }

    async fn generate_image(
        &self,
        prompt: &str,
        size: &str,
        timeout: Duration,
    ) -> Result<String, AiError> {
        let body = serde_json::json!({
            "model": IMAGE_MODEL,
            "prompt": prompt,
            "size": size,
            "n": 1,
        });
        let generation: ImageGeneration = self.post("images/generations", &body, timeout).await?;
        generation.into_url()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
