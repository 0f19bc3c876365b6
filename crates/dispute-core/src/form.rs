//! Form state manager
//!
//! `DisputeForm` owns the field values and the attachment list for one
//! form-filling session and exposes them through explicit commands. The
//! submission status lives in a `watch` channel so a running submission can
//! publish its phase without borrowing the form.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{DisputeError, FormError, ValidationFailure};
use crate::models::{
    Attachment, AttachmentSet, FormField, FormRecord, SubmissionOutcome, SubmissionPhase,
    SubmissionStatus, SubmitBlocker,
};

/// Field values, attachments and submission status of one dispute request.
#[derive(Debug)]
pub struct DisputeForm {
    record: FormRecord,
    attachments: AttachmentSet,
    status: Arc<watch::Sender<SubmissionStatus>>,
}

impl Default for DisputeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DisputeForm {
    pub fn new() -> Self {
        let (status, _) = watch::channel(SubmissionStatus::default());
        Self {
            record: FormRecord::default(),
            attachments: AttachmentSet::new(),
            status: Arc::new(status),
        }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn field(&self, field: FormField) -> &str {
        self.record.get(field)
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.borrow().clone()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.status.borrow().phase
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        self.status.borrow().outcome.clone()
    }

    /// Watch phase and outcome changes, including while a submission runs.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    /// Replace the value of one field.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.record.set(field, value.into());
        Ok(())
    }

    /// Append the picked files after the ones already attached.
    ///
    /// `selection` is drained, so the same file can be picked and added again.
    pub fn add_files(&mut self, selection: &mut Vec<Attachment>) -> Result<usize, FormError> {
        self.ensure_editable()?;
        let added = self.attachments.append(selection);
        tracing::debug!(
            added,
            total = self.attachments.len(),
            "Attachments added"
        );
        Ok(added)
    }

    /// Remove the file at `index`. Out of range leaves the list untouched.
    pub fn remove_file(&mut self, index: usize) -> Result<Option<Attachment>, FormError> {
        self.ensure_editable()?;
        Ok(self.attachments.remove(index))
    }

    /// Clear every field, every attachment and the submission status.
    pub fn reset(&mut self) -> Result<(), FormError> {
        if self.phase().is_in_flight() {
            return Err(FormError::InFlight);
        }
        self.record = FormRecord::default();
        self.attachments.clear();
        self.status.send_replace(SubmissionStatus::default());
        Ok(())
    }

    /// First reason the submit action is disabled, if any.
    pub fn submit_blocker(&self) -> Option<SubmitBlocker> {
        let phase = self.phase();
        if phase.is_in_flight() {
            return Some(SubmitBlocker::InFlight);
        }
        if phase == SubmissionPhase::Succeeded {
            return Some(SubmitBlocker::AlreadySubmitted);
        }
        if self.attachments.is_empty() {
            return Some(SubmitBlocker::NoAttachments);
        }
        self.record
            .missing_required()
            .first()
            .map(|field| SubmitBlocker::MissingField(*field))
    }

    pub fn can_submit(&self) -> bool {
        self.submit_blocker().is_none()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            record: self.record.clone(),
            attachments: self.attachments.clone(),
        }
    }

    /// Mark a submission as started and hand out the snapshot it works on.
    ///
    /// The phase becomes `Validating`; validation itself is the pipeline's job so
    /// an invalid form still ends in `Failed` with a message.
    pub fn begin_submission(&mut self) -> Result<Submission, FormError> {
        match self.phase() {
            phase if phase.is_in_flight() => return Err(FormError::InFlight),
            SubmissionPhase::Succeeded => return Err(FormError::Locked),
            _ => {}
        }

        self.status.send_replace(SubmissionStatus {
            phase: SubmissionPhase::Validating,
            outcome: SubmissionOutcome::Pending,
        });

        Ok(Submission {
            snapshot: self.snapshot(),
            tracker: SubmissionTracker {
                status: Arc::clone(&self.status),
                finished: false,
            },
        })
    }

    fn ensure_editable(&mut self) -> Result<(), FormError> {
        match self.phase() {
            SubmissionPhase::Succeeded => Err(FormError::Locked),
            SubmissionPhase::Failed => {
                self.status.send_modify(|s| s.phase = SubmissionPhase::Idle);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Read-only copy of the form taken when a submission starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub record: FormRecord,
    pub attachments: AttachmentSet,
}

impl FormSnapshot {
    /// Attachments are checked first: an empty set is always reported as such.
    pub fn validate(&self) -> Result<(), DisputeError> {
        if self.attachments.is_empty() {
            return Err(DisputeError::Validation(ValidationFailure::NoAttachments));
        }
        let missing = self.record.missing_required();
        if !missing.is_empty() {
            return Err(DisputeError::Validation(ValidationFailure::MissingFields(
                missing,
            )));
        }
        Ok(())
    }
}

/// A started submission: the snapshot plus the handle that reports progress.
#[derive(Debug)]
pub struct Submission {
    pub snapshot: FormSnapshot,
    pub tracker: SubmissionTracker,
}

/// Publishes the phase of one running submission back to its form.
///
/// Dropping the tracker before `succeed`/`fail` returns the form to `Idle`, so
/// the in-flight flag is cleared on every path.
#[derive(Debug)]
pub struct SubmissionTracker {
    status: Arc<watch::Sender<SubmissionStatus>>,
    finished: bool,
}

impl SubmissionTracker {
    pub fn phase(&self) -> SubmissionPhase {
        self.status.borrow().phase
    }

    pub fn advance(&self, phase: SubmissionPhase) {
        tracing::debug!(%phase, "Submission phase changed");
        self.status.send_modify(|s| s.phase = phase);
    }

    pub fn succeed(mut self, locator: Option<String>) -> SubmissionOutcome {
        self.finish(
            SubmissionPhase::Succeeded,
            SubmissionOutcome::Success { locator },
        )
    }

    pub fn fail(mut self, message: impl Into<String>) -> SubmissionOutcome {
        self.finish(
            SubmissionPhase::Failed,
            SubmissionOutcome::Failure {
                message: message.into(),
            },
        )
    }

    fn finish(&mut self, phase: SubmissionPhase, outcome: SubmissionOutcome) -> SubmissionOutcome {
        tracing::debug!(%phase, "Submission finished");
        self.status.send_replace(SubmissionStatus {
            phase,
            outcome: outcome.clone(),
        });
        self.finished = true;
        outcome
    }
}

impl Drop for SubmissionTracker {
    fn drop(&mut self) {
        if !self.finished {
            self.status.send_modify(|s| {
                if s.phase.is_in_flight() {
                    s.phase = SubmissionPhase::Idle;
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Attachment {
        Attachment::new(name, "application/pdf", vec![0u8; 4])
    }

    fn filled_form() -> DisputeForm {
        let mut form = DisputeForm::new();
        for field in FormField::ALL {
            if field.is_required() {
                form.set_field(field, format!("{} value", field)).unwrap();
            }
        }
        form.add_files(&mut vec![file("a.pdf")]).unwrap();
        form
    }

    #[test]
    fn add_files_accumulates_across_calls() {
        let mut form = DisputeForm::new();
        let batches = [vec!["a.pdf", "b.pdf"], vec!["c.png"], vec![], vec!["a.pdf"]];
        let mut expected = 0;
        for batch in batches {
            let mut selection: Vec<Attachment> = batch.iter().map(|n| file(n)).collect();
            expected += selection.len();
            form.add_files(&mut selection).unwrap();
            assert!(selection.is_empty());
            assert_eq!(form.attachments().len(), expected);
        }
        assert_eq!(
            form.attachments().names(),
            vec!["a.pdf", "b.pdf", "c.png", "a.pdf"]
        );
    }

    #[test]
    fn remove_file_keeps_relative_order() {
        let mut form = DisputeForm::new();
        let mut selection = vec![file("a"), file("b"), file("c"), file("d")];
        form.add_files(&mut selection).unwrap();

        let removed = form.remove_file(1).unwrap().unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(form.attachments().names(), vec!["a", "c", "d"]);

        assert!(form.remove_file(3).unwrap().is_none());
        assert_eq!(form.attachments().len(), 3);
    }

    #[test]
    fn can_submit_requires_files_and_required_fields() {
        let mut form = DisputeForm::new();
        assert_eq!(form.submit_blocker(), Some(SubmitBlocker::NoAttachments));

        let mut form_without_files = filled_form();
        form_without_files.remove_file(0).unwrap();
        assert!(!form_without_files.can_submit());

        let form_ok = filled_form();
        assert!(form_ok.can_submit());

        form = filled_form();
        form.set_field(FormField::OccurrenceSummary, "").unwrap();
        assert_eq!(
            form.submit_blocker(),
            Some(SubmitBlocker::MissingField(FormField::OccurrenceSummary))
        );

        form.set_field(FormField::OccurrenceSummary, "late gate-in").unwrap();
        form.set_field(FormField::FirstReturnAttemptDate, "").unwrap();
        assert!(form.can_submit());
    }

    #[test]
    fn can_submit_is_false_while_in_flight() {
        let mut form = filled_form();
        let submission = form.begin_submission().unwrap();
        assert_eq!(form.phase(), SubmissionPhase::Validating);
        assert_eq!(form.submit_blocker(), Some(SubmitBlocker::InFlight));
        assert_eq!(form.begin_submission().unwrap_err(), FormError::InFlight);

        submission.tracker.advance(SubmissionPhase::Uploading);
        assert!(!form.can_submit());
        submission.tracker.advance(SubmissionPhase::Posting);
        assert!(!form.can_submit());
        assert_eq!(form.reset().unwrap_err(), FormError::InFlight);

        submission.tracker.fail("boom");
        assert_eq!(form.phase(), SubmissionPhase::Failed);
        assert!(form.can_submit());
    }

    #[test]
    fn dropped_tracker_clears_in_flight() {
        let mut form = filled_form();
        let submission = form.begin_submission().unwrap();
        submission.tracker.advance(SubmissionPhase::Uploading);
        drop(submission);

        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert_eq!(form.outcome(), SubmissionOutcome::Pending);
        assert!(form.can_submit());
    }

    #[test]
    fn success_locks_edits_until_reset() {
        let mut form = filled_form();
        let submission = form.begin_submission().unwrap();
        submission.tracker.succeed(None);

        assert_eq!(form.phase(), SubmissionPhase::Succeeded);
        assert_eq!(
            form.set_field(FormField::Bl, "other").unwrap_err(),
            FormError::Locked
        );
        assert_eq!(
            form.add_files(&mut vec![file("x")]).unwrap_err(),
            FormError::Locked
        );
        assert_eq!(form.remove_file(0).unwrap_err(), FormError::Locked);
        assert_eq!(form.begin_submission().unwrap_err(), FormError::Locked);
        assert_eq!(form.submit_blocker(), Some(SubmitBlocker::AlreadySubmitted));
    }

    #[test]
    fn reset_after_success_matches_initial_state() {
        let initial = DisputeForm::new();
        let mut form = filled_form();
        let submission = form.begin_submission().unwrap();
        submission
            .tracker
            .succeed(Some("https://example.com/disputes/1".to_string()));

        form.reset().unwrap();
        assert_eq!(form.snapshot(), initial.snapshot());
        assert_eq!(form.status(), initial.status());
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert!(FormField::ALL.iter().all(|f| form.field(*f).is_empty()));
    }

    #[test]
    fn edit_after_failure_returns_to_idle_and_keeps_message() {
        let mut form = filled_form();
        let submission = form.begin_submission().unwrap();
        submission.tracker.fail("Failed to send. Please try again.");
        assert_eq!(form.phase(), SubmissionPhase::Failed);

        form.set_field(FormField::RequestReason, "updated").unwrap();
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert_eq!(
            form.outcome().failure_message(),
            Some("Failed to send. Please try again.")
        );
        assert_eq!(form.field(FormField::RequestReason), "updated");
        assert_eq!(form.attachments().len(), 1);
    }

    #[test]
    fn snapshot_validation_reports_attachments_first() {
        let snapshot = DisputeForm::new().snapshot();
        assert!(matches!(
            snapshot.validate(),
            Err(DisputeError::Validation(ValidationFailure::NoAttachments))
        ));

        let mut form = DisputeForm::new();
        form.add_files(&mut vec![file("a.pdf")]).unwrap();
        match form.snapshot().validate() {
            Err(DisputeError::Validation(ValidationFailure::MissingFields(fields))) => {
                assert_eq!(fields.len(), 9);
            }
            other => panic!("unexpected: {:?}", other),
        }

        assert!(filled_form().snapshot().validate().is_ok());
    }

    #[tokio::test]
    async fn subscribers_see_phase_changes() {
        let mut form = filled_form();
        let mut rx = form.subscribe();
        let submission = form.begin_submission().unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase, SubmissionPhase::Validating);

        submission.tracker.advance(SubmissionPhase::Posting);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase, SubmissionPhase::Posting);
    }
}
