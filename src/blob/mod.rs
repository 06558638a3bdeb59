//! Client for the external blob store. The contract is minimal: PUT the
//! raw bytes under a name, get back a public URL. Stored objects are never
//! deleted from here; orphaned blobs are tolerated.

use std::sync::OnceLock;

use axum::body::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("blob upload rejected with status {status}: {detail}")]
    UploadRejected { status: u16, detail: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub struct BlobStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PutResult {
    url: String,
}

impl BlobStore {
    /// Shared client instance. Fails fast when no write token is configured
    /// so handlers reject uploads instead of timing out against the store.
    pub fn client() -> Result<&'static BlobStore, BlobError> {
        static INSTANCE: OnceLock<BlobStore> = OnceLock::new();

        let blob_config = &config::config().blob;
        if blob_config.token.is_empty() {
            return Err(BlobError::ConfigMissing("BLOB_READ_WRITE_TOKEN"));
        }

        Ok(INSTANCE.get_or_init(|| BlobStore {
            client: reqwest::Client::new(),
            base_url: blob_config.base_url.trim_end_matches('/').to_string(),
            token: blob_config.token.clone(),
        }))
    }

    /// Upload one object and return its public URL.
    pub async fn put(&self, name: &str, bytes: Bytes) -> Result<String, BlobError> {
        let url = format!("{}/{}", self.base_url, name);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .query(&[("access", "public")])
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BlobError::UploadRejected { status: status.as_u16(), detail });
        }

        let result: PutResult = response.json().await?;
        Ok(result.url)
    }
}
