//! Submission lifecycle: phase, outcome and what blocks a submit.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::FormField;

/// Where a submission is in its lifecycle.
///
/// `Idle → Validating → Uploading → Posting → Succeeded | Failed`.
/// `Failed` returns to `Idle` on the next edit or retry; `Succeeded` only on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Uploading,
    Posting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            SubmissionPhase::Validating | SubmissionPhase::Uploading | SubmissionPhase::Posting
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionPhase::Succeeded | SubmissionPhase::Failed)
    }
}

impl Display for SubmissionPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::Uploading => "uploading",
            SubmissionPhase::Posting => "posting",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of the latest submission, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    #[default]
    Pending,
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        locator: Option<String>,
    },
    Failure {
        message: String,
    },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Failure { message } => Some(message),
            _ => None,
        }
    }
}

/// Phase and outcome published together while a submission runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub phase: SubmissionPhase,
    pub outcome: SubmissionOutcome,
}

/// First reason the submit action is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocker {
    InFlight,
    AlreadySubmitted,
    NoAttachments,
    MissingField(FormField),
}

impl Display for SubmitBlocker {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SubmitBlocker::InFlight => f.write_str("Sending..."),
            SubmitBlocker::AlreadySubmitted => {
                f.write_str("Request already sent. Start a new request to submit again.")
            }
            SubmitBlocker::NoAttachments => f.write_str("* Attach at least one file to submit."),
            SubmitBlocker::MissingField(field) => write!(f, "Required: {}", field.label()),
        }
    }
}
