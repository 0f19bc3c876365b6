#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
#[cfg(feature = "storage-supabase")]
use crate::SupabaseStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use dispute_core::DisputeConfig;
use std::sync::Arc;

/// Create the configured storage sink, or `None` when attachments are posted inline.
pub async fn create_storage(config: &DisputeConfig) -> StorageResult<Option<Arc<dyn Storage>>> {
    let Some(backend) = config.storage_backend else {
        return Ok(None);
    };

    let bucket = || {
        config
            .storage_bucket
            .clone()
            .ok_or_else(|| StorageError::ConfigError("DISPUTE_STORAGE_BUCKET not configured".to_string()))
    };

    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("DISPUTE_S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let storage = S3Storage::new(bucket()?, region, config.s3_endpoint.clone())?;
            Ok(Some(Arc::new(storage)))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-supabase")]
        StorageBackend::Supabase => {
            let url = config.supabase_url.clone().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let key = config.supabase_key.clone().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_KEY not configured".to_string())
            })?;
            let storage = SupabaseStorage::new(url, key, bucket()?, config.request_timeout())?;
            Ok(Some(Arc::new(storage)))
        }

        #[cfg(not(feature = "storage-supabase"))]
        StorageBackend::Supabase => Err(StorageError::ConfigError(
            "Supabase storage backend not available (storage-supabase feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("DISPUTE_LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("DISPUTE_LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Some(Arc::new(storage)))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config() -> DisputeConfig {
        DisputeConfig {
            endpoint_url: "http://localhost:5000/api/formulario".to_string(),
            request_timeout_secs: 60,
            storage_backend: None,
            storage_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            supabase_url: None,
            supabase_key: None,
            local_storage_path: None,
            local_storage_base_url: None,
        }
    }

    #[tokio::test]
    async fn no_backend_means_no_sink() {
        assert!(create_storage(&config()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn local_backend_is_built() {
        let dir = tempdir().unwrap();
        let mut config = config();
        config.storage_backend = Some(StorageBackend::Local);
        config.local_storage_path = Some(dir.path().to_string_lossy().to_string());
        config.local_storage_base_url = Some("http://localhost:8080/uploads".to_string());

        let storage = create_storage(&config).await.unwrap().unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn missing_settings_are_config_errors() {
        let mut config = config();
        config.storage_backend = Some(StorageBackend::Local);
        assert!(matches!(
            create_storage(&config).await,
            Err(StorageError::ConfigError(_))
        ));
    }
}
