//! Object storage for user-uploaded images.
//!
//! [`S3ObjectStore`] writes objects with a `public-read` ACL to any
//! S3-compatible endpoint (AWS, or Google Cloud Storage through its XML
//! interoperability API) and returns the public URL of the stored object.

use std::time::Duration;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for object storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The provider rejected the upload or could not be reached.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The upload did not finish within the allotted time.
    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Uploads a blob and returns the URL clients can fetch it from.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<String, StorageError>;
}

// ---------------------------------------------------------------------------
// S3-compatible implementation
// ---------------------------------------------------------------------------

/// Settings for [`S3ObjectStore`].
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (e.g. `https://storage.googleapis.com`); `None` uses AWS.
    pub endpoint: Option<String>,
    /// Base of the public URL; the object URL is `<base>/<bucket>/<path>`.
    pub public_base_url: String,
    /// Static HMAC credentials. `None` falls back to the default AWS
    /// credential chain (env vars, profile, instance metadata).
    pub access_key: Option<(String, String)>,
}

/// [`ObjectStore`] backed by `aws-sdk-s3`.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build the SDK client from settings. Does not contact the provider.
    pub async fn new(settings: S3Settings) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        if let Some((key_id, secret)) = &settings.access_key {
            builder = builder.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "fictsu-config",
            ));
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: settings.bucket,
            public_base_url: settings.public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<String, StorageError> {
        let size = data.len();
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(data))
            .send();

        tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| StorageError::Timeout(timeout))?
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket = %self.bucket, path, size, "Object uploaded");
        Ok(public_url(&self.public_base_url, &self.bucket, path))
    }
}

/// Public URL of an object: `<base>/<bucket>/<path>`.
pub fn public_url(base: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        bucket,
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_without_double_slashes() {
        assert_eq!(
            public_url("https://storage.googleapis.com/", "fictsu", "/covers/1"),
            "https://storage.googleapis.com/fictsu/covers/1"
        );
        assert_eq!(
            public_url("https://cdn.example.com", "b", "chapters/1/2/x"),
            "https://cdn.example.com/b/chapters/1/2/x"
        );
    }

    #[test]
    fn storage_error_display() {
        let err = StorageError::Timeout(Duration::from_secs(3));
        assert_eq!(err.to_string(), "Upload timed out after 3s");

        let err = StorageError::Upload("access denied".into());
        assert_eq!(err.to_string(), "Upload failed: access denied");
    }
}
