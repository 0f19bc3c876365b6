use async_trait::async_trait;
use bytes::Bytes;
use dispute_services::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const PUBLIC_BASE: &str = "https://files.test/disputes";

/// In-memory sink that records every upload.
///
/// Keys ending in one of `failing` are rejected; successful uploads can be
/// delayed, and an optional gate holds uploads until the test releases them.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    order: Mutex<Vec<String>>,
    failing: Vec<String>,
    delay: Option<Duration>,
    file_delays: Vec<(String, Duration)>,
    gate: Option<UploadGate>,
}

#[derive(Clone, Default)]
pub struct UploadGate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, filename: &str) -> Self {
        self.failing.push(filename.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay only the upload whose key ends in `filename`.
    pub fn with_delay_for(mut self, filename: &str, delay: Duration) -> Self {
        self.file_delays.push((filename.to_string(), delay));
        self
    }

    pub fn with_gate(mut self, gate: UploadGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Keys of stored objects, in completion order.
    pub fn stored_keys(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        if self.failing.iter().any(|name| storage_key.ends_with(name.as_str())) {
            return Err(StorageError::UploadFailed(format!(
                "simulated failure for {}",
                storage_key
            )));
        }

        let delay = self
            .file_delays
            .iter()
            .find(|(name, _)| storage_key.ends_with(name.as_str()))
            .map(|(_, delay)| *delay)
            .or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.objects
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), (data, content_type.to_string()));
        self.order.lock().unwrap().push(storage_key.to_string());
        Ok(storage_key.to_string())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, storage_key)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(storage_key)
            .map(|(data, _)| data.to_vec())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
