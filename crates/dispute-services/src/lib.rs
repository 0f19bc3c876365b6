//! Dispute Services Layer
//!
//! This crate hosts the submission pipeline: the orchestration that takes a
//! snapshot of a `DisputeForm`, validates it, uploads the attachments to the
//! configured storage sink and posts the consolidated request to the backend.
//! It re-exports the storage and client types callers need so binaries depend
//! on a single facade.

pub mod pipeline;

pub use dispute_api_client::{ApiClient, ApiError, SubmissionReceipt};
pub use dispute_storage::{
    attachment_storage_key, create_storage, Storage, StorageBackend, StorageError, StorageResult,
};
pub use pipeline::{SubmissionPipeline, UploadResult};
