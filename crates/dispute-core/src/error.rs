//! Error types module
//!
//! `FormError` covers commands rejected by the form state manager.
//! `DisputeError` covers everything that can fail a submission; the pipeline
//! turns it into a `SubmissionOutcome::Failure` using `ErrorMetadata::client_message`.

use crate::constants::{
    GENERIC_RETRY_MESSAGE, MISSING_FIELDS_MESSAGE, NO_ATTACHMENTS_MESSAGE, UPLOAD_FAILED_MESSAGE,
};
use crate::models::FormField;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a backend rejecting the request
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error is presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same submission can succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Message shown inline under the form
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Commands the form refuses in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Form already submitted; reset it to start a new request")]
    Locked,

    #[error("A submission is already in flight")]
    InFlight,
}

/// Why a snapshot was rejected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    NoAttachments,
    MissingFields(Vec<FormField>),
}

#[derive(Debug, thiserror::Error)]
pub enum DisputeError {
    #[error("Validation failed: {}", validation_detail(.0))]
    Validation(ValidationFailure),

    #[error("{failed} of {total} attachment uploads failed")]
    Upload { failed: usize, total: usize },

    #[error("Submission failed{}: {}", status_suffix(.status), .message.as_deref().unwrap_or("no details"))]
    Submission {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn validation_detail(failure: &ValidationFailure) -> String {
    match failure {
        ValidationFailure::NoAttachments => "no attachments".to_string(),
        ValidationFailure::MissingFields(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.wire_name()).collect();
            format!("missing {}", names.join(", "))
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {}", s)).unwrap_or_default()
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn dispute_error_static_metadata(
    err: &DisputeError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        DisputeError::Validation(_) => (
            "VALIDATION_ERROR",
            false,
            Some("Complete the form and attach at least one file"),
            LogLevel::Debug,
        ),
        DisputeError::Upload { .. } => (
            "UPLOAD_FAILED",
            true,
            Some("Retry the submission"),
            LogLevel::Error,
        ),
        DisputeError::Submission { .. } => (
            "SUBMISSION_FAILED",
            true,
            Some("Retry the submission"),
            LogLevel::Warn,
        ),
        DisputeError::Configuration(_) => (
            "CONFIGURATION_ERROR",
            false,
            Some("Check the dispute intake configuration"),
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for DisputeError {
    fn error_code(&self) -> &'static str {
        dispute_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        dispute_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        dispute_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        dispute_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            DisputeError::Validation(ValidationFailure::NoAttachments) => {
                NO_ATTACHMENTS_MESSAGE.to_string()
            }
            DisputeError::Validation(ValidationFailure::MissingFields(_)) => {
                MISSING_FIELDS_MESSAGE.to_string()
            }
            DisputeError::Upload { .. } => UPLOAD_FAILED_MESSAGE.to_string(),
            DisputeError::Submission { message, .. } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(GENERIC_RETRY_MESSAGE)
                .to_string(),
            DisputeError::Configuration(_) => GENERIC_RETRY_MESSAGE.to_string(),
        }
    }
}
