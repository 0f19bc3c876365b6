//! Supabase Storage over its REST API.
//!
//! Objects are written to `{project_url}/storage/v1/object/{bucket}/{key}` with the
//! service key and served from the bucket's public URL.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

/// Supabase Storage implementation
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    project_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `project_url` - Project URL (e.g., "https://abcd.supabase.co")
    /// * `service_key` - API key sent as both `apikey` and bearer token
    /// * `bucket` - Bucket name; must be public for the returned URLs to be fetchable
    pub fn new(
        project_url: String,
        service_key: String,
        bucket: String,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SupabaseStorage {
            client,
            project_url: project_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        })
    }

    fn encoded_key(storage_key: &str) -> String {
        storage_key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.project_url,
            self.bucket,
            Self::encoded_key(storage_key)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.service_key.as_str())
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn error_text(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("status {}: {}", status, body)
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = data.len();
        let start = std::time::Instant::now();

        let request = self
            .client
            .post(self.object_url(storage_key))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data);

        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload request failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        if !response.status().is_success() {
            let detail = Self::error_text(response).await;
            tracing::error!(
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                detail = %detail,
                "Supabase upload rejected"
            );
            return Err(StorageError::UploadFailed(detail));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok(storage_key.to_string())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.project_url,
            self.bucket,
            Self::encoded_key(storage_key)
        )
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;

        let response = self
            .authorize(self.client.get(self.object_url(storage_key)))
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        match response.status() {
            // Supabase answers 400 for missing objects in some versions.
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            _ => Err(StorageError::DownloadFailed(
                Self::error_text(response).await,
            )),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;

        let response = self
            .authorize(self.client.head(self.object_url(storage_key)))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(StorageError::BackendError(format!(
                "Unexpected status {} checking {}",
                status, storage_key
            ))),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;

        let url = format!("{}/storage/v1/object/{}", self.project_url, self.bucket);
        let body = serde_json::json!({ "prefixes": [storage_key] });

        let response = self
            .authorize(self.client.delete(url))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::DeleteFailed(Self::error_text(response).await));
        }

        tracing::info!(bucket = %self.bucket, key = %storage_key, "Supabase delete successful");
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
