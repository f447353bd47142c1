//! Blob upload collaborator. Files are uploaded before the owning resource
//! is persisted; any failure aborts the whole create or update.

use async_trait::async_trait;
use chrono::Utc;

use crate::config;
use crate::models::Attachment;

use super::UpstreamError;

/// A file received from a multipart request, held in memory until upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<Attachment, UpstreamError>;
}

/// S3-style object store client: a PUT per file against the configured
/// bucket endpoint.
pub struct HttpBlobStore {
    client: reqwest::Client,
}

impl HttpBlobStore {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, file: &UploadFile) -> Result<Attachment, UpstreamError> {
        let upload = &config::config().upload;
        let key = format!("{}_{}", Utc::now().timestamp_millis(), file.name);
        let url = format!("{}/{}/{}", upload.base_url, upload.bucket, key);

        let response = self
            .client
            .put(&url)
            .header("content-type", &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Http("blob store", e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamError::BadResponse(
                "blob store",
                format!("status {}", response.status()),
            ));
        }

        Ok(Attachment {
            url,
            name: file.name.clone(),
            provider: upload.provider.clone(),
        })
    }
}

/// Keeps nothing and talks to nobody: names a deterministic local URL for
/// each file. Used in development without an object store, and by the
/// integration tests.
pub struct LocalBlobStore;

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, file: &UploadFile) -> Result<Attachment, UpstreamError> {
        Ok(Attachment {
            url: format!("local://{}/{}", config::config().upload.bucket, file.name),
            name: file.name.clone(),
            provider: "LOCAL".to_string(),
        })
    }
}
