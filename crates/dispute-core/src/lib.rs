//! Dispute Core Library
//!
//! Domain models, the form state manager, error types and configuration
//! shared by the storage sinks, the backend client and the submission pipeline.

pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{DisputeConfig, PipelineConfig};
pub use error::{DisputeError, ErrorMetadata, FormError, LogLevel, ValidationFailure};
pub use form::{DisputeForm, FormSnapshot, Submission, SubmissionTracker};
pub use models::{
    Attachment, AttachmentSet, FormField, FormRecord, SubmissionOutcome, SubmissionPhase,
    SubmissionStatus, SubmitBlocker,
};
pub use storage_types::StorageBackend;
