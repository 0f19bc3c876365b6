//! Submission pipeline
//!
//! `Idle → Validating → Uploading → Posting → Succeeded | Failed`
//!
//! Uploading only happens when a storage sink is configured; without one the
//! files are posted inline as multipart. Every error is caught here and turned
//! into `SubmissionOutcome::Failure`; the tracker guarantees the in-flight flag
//! is cleared whichever way the submission ends.

use std::sync::Arc;

use dispute_api_client::{ApiClient, SubmissionReceipt};
use dispute_core::{
    DisputeConfig, DisputeError, DisputeForm, ErrorMetadata, FormError, FormSnapshot, LogLevel,
    PipelineConfig, Submission, SubmissionOutcome, SubmissionPhase, SubmissionTracker,
};
use dispute_storage::{attachment_storage_key, create_storage, Storage, StorageResult};
use futures::future::join_all;
use uuid::Uuid;

/// Where one attachment ended up in the storage sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub storage_key: String,
    pub public_url: String,
}

/// Runs submissions against one backend endpoint and, optionally, one storage sink.
#[derive(Clone)]
pub struct SubmissionPipeline {
    config: PipelineConfig,
    client: ApiClient,
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionPipeline {
    /// Build a pipeline. With `storage`, attachments are uploaded first and the
    /// backend receives their public URLs as JSON; without it they are posted
    /// inline as multipart.
    pub fn new(
        config: PipelineConfig,
        storage: Option<Arc<dyn Storage>>,
    ) -> Result<Self, DisputeError> {
        let client = ApiClient::new(config.endpoint_url.clone(), config.request_timeout)
            .map_err(|e| DisputeError::Configuration(e.to_string()))?;

        Ok(Self {
            config,
            client,
            storage,
        })
    }

    /// Build the pipeline and its storage sink from the full configuration.
    pub async fn from_config(config: &DisputeConfig) -> Result<Self, DisputeError> {
        let storage = create_storage(config)
            .await
            .map_err(|e| DisputeError::Configuration(e.to_string()))?;
        Self::new(config.pipeline_config(), storage)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn uses_direct_upload(&self) -> bool {
        self.storage.is_some()
    }

    /// Start a submission on `form` and run it to completion.
    ///
    /// Refused only when the form is already in flight or already submitted;
    /// every other problem ends up in the returned outcome.
    pub async fn submit(&self, form: &mut DisputeForm) -> Result<SubmissionOutcome, FormError> {
        let submission = form.begin_submission()?;
        Ok(self.run(submission).await)
    }

    /// Run a submission obtained from `DisputeForm::begin_submission`.
    #[tracing::instrument(skip(self, submission), fields(
        submission_id = tracing::field::Empty,
        endpoint = %self.config.endpoint_url,
        bucket = self.config.storage_bucket.as_deref().unwrap_or("-"),
    ))]
    pub async fn run(&self, submission: Submission) -> SubmissionOutcome {
        let Submission { snapshot, tracker } = submission;
        let submission_id = Uuid::new_v4();
        tracing::Span::current().record("submission_id", tracing::field::display(submission_id));

        let start = std::time::Instant::now();
        match self.execute(&snapshot, &tracker, submission_id).await {
            Ok(receipt) => {
                tracing::info!(
                    status = receipt.status,
                    attachments = snapshot.attachments.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Dispute submitted"
                );
                tracker.succeed(receipt.locator)
            }
            Err(err) => {
                log_failure(&err, tracker.phase());
                tracker.fail(err.client_message())
            }
        }
    }

    async fn execute(
        &self,
        snapshot: &FormSnapshot,
        tracker: &SubmissionTracker,
        submission_id: Uuid,
    ) -> Result<SubmissionReceipt, DisputeError> {
        snapshot.validate()?;

        let receipt = match &self.storage {
            Some(storage) => {
                tracker.advance(SubmissionPhase::Uploading);
                let uploads = upload_attachments(storage.as_ref(), snapshot, submission_id).await?;
                let urls: Vec<String> = uploads.into_iter().map(|u| u.public_url).collect();

                tracker.advance(SubmissionPhase::Posting);
                self.client.submit_json(&snapshot.record, &urls).await?
            }
            None => {
                tracker.advance(SubmissionPhase::Posting);
                self.client
                    .submit_multipart(&snapshot.record, &snapshot.attachments)
                    .await?
            }
        };

        Ok(receipt)
    }
}

/// Upload every attachment concurrently and wait for all of them.
///
/// Results come back in attachment order. A single failure fails the whole
/// batch; uploads that did succeed are left in the sink.
pub async fn upload_attachments(
    storage: &dyn Storage,
    snapshot: &FormSnapshot,
    submission_id: Uuid,
) -> Result<Vec<UploadResult>, DisputeError> {
    let shipment = snapshot.record.shipment_identifier();

    let uploads = snapshot
        .attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| {
            let key = attachment_storage_key(shipment, submission_id, index + 1, &attachment.name);
            async move {
                let result: StorageResult<UploadResult> = storage
                    .upload_with_key(&key, attachment.data.clone(), &attachment.content_type)
                    .await
                    .map(|stored| UploadResult {
                        public_url: storage.public_url(&stored),
                        storage_key: stored,
                    });
                (key, result)
            }
        });

    let results = join_all(uploads).await;
    let total = results.len();
    let mut succeeded = Vec::with_capacity(total);
    let mut failed = 0;

    for (key, result) in results {
        match result {
            Ok(upload) => succeeded.push(upload),
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, storage_key = %key, "Attachment upload failed");
            }
        }
    }

    if failed > 0 {
        return Err(DisputeError::Upload { failed, total });
    }

    Ok(succeeded)
}

fn log_failure(err: &DisputeError, phase: SubmissionPhase) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, code, %phase, "Submission rejected"),
        LogLevel::Warn => tracing::warn!(error = %err, code, %phase, "Submission failed"),
        LogLevel::Error => tracing::error!(error = %err, code, %phase, "Submission failed"),
    }
}
