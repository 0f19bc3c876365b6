//! Configuration module
//!
//! `DisputeConfig` is read from the environment (a `.env` file is honoured).
//! `PipelineConfig` is the explicit configuration object handed to the
//! submission pipeline at construction.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const SUPABASE_DEFAULT_BUCKET: &str = "uploads";

/// Settings the submission pipeline needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Backend submission endpoint (full URL, POSTed to once per submission).
    pub endpoint_url: String,
    /// Bucket of the storage sink, reported in logs. `None` when no sink is
    /// configured or the sink has no bucket (local storage). Whether files are
    /// uploaded or posted inline depends only on the sink handed to the pipeline.
    pub storage_bucket: Option<String>,
    /// Transport timeout for every backend request.
    pub request_timeout: Duration,
}

impl PipelineConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            storage_bucket: None,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_storage_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage_bucket = Some(bucket.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Full configuration: backend endpoint plus the storage sink settings.
#[derive(Clone, Debug)]
pub struct DisputeConfig {
    pub endpoint_url: String,
    pub request_timeout_secs: u64,
    pub storage_backend: Option<StorageBackend>,
    pub storage_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

impl DisputeConfig {
    /// Load from `DISPUTE_*` environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let endpoint_url = env::var("DISPUTE_ENDPOINT_URL")
            .map_err(|_| anyhow::anyhow!("DISPUTE_ENDPOINT_URL must be set"))?;

        let storage_backend = match optional_var("DISPUTE_STORAGE_BACKEND") {
            None => None,
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(value) => Some(value.parse::<StorageBackend>()?),
        };

        let mut storage_bucket = optional_var("DISPUTE_STORAGE_BUCKET");
        if storage_backend == Some(StorageBackend::Supabase) && storage_bucket.is_none() {
            storage_bucket = Some(SUPABASE_DEFAULT_BUCKET.to_string());
        }

        let config = DisputeConfig {
            endpoint_url,
            request_timeout_secs: env::var("DISPUTE_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DISPUTE_REQUEST_TIMEOUT_SECS must be a valid number"))?,
            storage_backend,
            storage_bucket,
            s3_region: optional_var("DISPUTE_S3_REGION").or_else(|| optional_var("AWS_REGION")),
            s3_endpoint: optional_var("DISPUTE_S3_ENDPOINT"),
            supabase_url: optional_var("DISPUTE_SUPABASE_URL")
                .or_else(|| optional_var("SUPABASE_URL")),
            supabase_key: optional_var("DISPUTE_SUPABASE_KEY")
                .or_else(|| optional_var("SUPABASE_KEY")),
            local_storage_path: optional_var("DISPUTE_LOCAL_STORAGE_PATH"),
            local_storage_base_url: optional_var("DISPUTE_LOCAL_STORAGE_BASE_URL"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.endpoint_url.starts_with("http://") || self.endpoint_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "DISPUTE_ENDPOINT_URL must be an http(s) URL"
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "DISPUTE_REQUEST_TIMEOUT_SECS must be greater than zero"
            ));
        }

        // Validate storage backend configuration
        match self.storage_backend {
            None => {}
            Some(StorageBackend::S3) => {
                if self.storage_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "DISPUTE_STORAGE_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "DISPUTE_S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            Some(StorageBackend::Local) => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "DISPUTE_LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "DISPUTE_LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            Some(StorageBackend::Supabase) => {
                if self.supabase_url.is_none() || self.supabase_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL and SUPABASE_KEY must be set when using Supabase storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configuration object handed to the submission pipeline.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            endpoint_url: self.endpoint_url.clone(),
            storage_bucket: self
                .storage_backend
                .and(self.storage_bucket.clone()),
            request_timeout: self.request_timeout(),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
