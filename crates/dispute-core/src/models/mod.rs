//! Data models for the dispute form
//!
//! This module contains the data structures shared by the form state manager,
//! the submission pipeline and the backend client, organized by concern.

mod attachment;
mod form_record;
mod submission;

// Re-export all models for convenient imports
pub use attachment::*;
pub use form_record::*;
pub use submission::*;
