//! Submission encodings for the dispute endpoint.
//!
//! JSON carries the form fields plus the public URL of every uploaded file;
//! multipart carries the form fields plus the files themselves.

use crate::{ApiClient, ApiError, SubmissionReceipt};
use dispute_core::constants::MULTIPART_FILE_FIELD;
use dispute_core::{Attachment, AttachmentSet, FormRecord};
use reqwest::multipart::{Form, Part};
use serde::Serialize;

/// JSON body: every form field as a string property plus `attachmentUrls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputePayload<'a> {
    #[serde(flatten)]
    pub record: &'a FormRecord,
    pub attachment_urls: &'a [String],
}

impl ApiClient {
    /// Post the form with the locators of files already uploaded to storage.
    pub async fn submit_json(
        &self,
        record: &FormRecord,
        attachment_urls: &[String],
    ) -> Result<SubmissionReceipt, ApiError> {
        let payload = DisputePayload {
            record,
            attachment_urls,
        };
        self.post_json(&payload).await
    }

    /// Post the form with the files inlined, one part per file under the same name.
    pub async fn submit_multipart(
        &self,
        record: &FormRecord,
        attachments: &AttachmentSet,
    ) -> Result<SubmissionReceipt, ApiError> {
        self.post_multipart(multipart_form(record, attachments)).await
    }
}

/// Build the multipart body: one text part per field, then one part per file.
pub fn multipart_form(record: &FormRecord, attachments: &AttachmentSet) -> Form {
    let form = record.entries().fold(Form::new(), |form, (field, value)| {
        form.text(field.wire_name(), value.to_string())
    });

    attachments.iter().fold(form, |form, attachment| {
        form.part(MULTIPART_FILE_FIELD, file_part(attachment))
    })
}

fn file_part(attachment: &Attachment) -> Part {
    match payload_part(attachment).mime_str(&attachment.content_type) {
        Ok(part) => part,
        Err(e) => {
            tracing::warn!(
                error = %e,
                file = %attachment.name,
                content_type = %attachment.content_type,
                "Ignoring invalid content type"
            );
            payload_part(attachment)
        }
    }
}

/// Shares the attachment's buffer instead of copying it.
fn payload_part(attachment: &Attachment) -> Part {
    Part::stream_with_length(attachment.data.clone(), attachment.size() as u64)
        .file_name(attachment.name.clone())
}
