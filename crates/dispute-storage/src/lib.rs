//! Dispute Storage Library
//!
//! This crate provides the storage sink abstraction attachments are uploaded to
//! before a dispute is posted, with implementations for S3, Supabase Storage and
//! the local filesystem.
//!
//! # Storage key format
//!
//! Every attachment of one submission lands under the same prefix:
//!
//! `{shipment}/{submission_id}/{position}-{filename}`
//!
//! where `shipment` and `filename` are sanitized and `position` is 1-based.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use dispute_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{attachment_storage_key, sanitize_path_component};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult};
