use anyhow::Context;
use dispute_core::constants::SUCCESS_MESSAGE;
use dispute_core::{Attachment, DisputeForm, FormField, SubmissionOutcome};
use dispute_services::attachment_storage_key;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Fill a form from a JSON object keyed by wire names (`bl`, `containerInfo`, ...).
///
/// Unknown keys and non-string values are rejected rather than ignored.
pub fn load_form(json: &str) -> anyhow::Result<DisputeForm> {
    let values: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(json).context("Form file must be a JSON object")?;

    let mut form = DisputeForm::new();
    for (key, value) in values {
        let field = FormField::from_str(&key)?;
        let value = value
            .as_str()
            .with_context(|| format!("Value of {} must be a string", key))?;
        form.set_field(field, value)?;
    }
    Ok(form)
}

/// Read a file from disk as an attachment, guessing its content type from the extension.
pub async fn load_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Attachment::new(name, content_type.essence_str(), data))
}

/// Storage paths a submission of `files` for `shipment` would use.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPreview {
    pub submission_id: Uuid,
    pub paths: Vec<String>,
}

pub fn preview_paths(shipment: &str, files: &[String]) -> PathPreview {
    let submission_id = Uuid::new_v4();
    let paths = files
        .iter()
        .enumerate()
        .map(|(index, name)| attachment_storage_key(shipment, submission_id, index + 1, name))
        .collect();
    PathPreview {
        submission_id,
        paths,
    }
}

#[derive(Debug, Serialize)]
pub struct OutcomeReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl From<&SubmissionOutcome> for OutcomeReport {
    fn from(outcome: &SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Success { locator } => OutcomeReport {
                success: true,
                message: SUCCESS_MESSAGE.to_string(),
                locator: locator.clone(),
            },
            SubmissionOutcome::Failure { message } => OutcomeReport {
                success: false,
                message: message.clone(),
                locator: None,
            },
            SubmissionOutcome::Pending => OutcomeReport {
                success: false,
                message: "Submission did not finish".to_string(),
                locator: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldDescription {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Every form field in presentation order.
pub fn describe_fields() -> Vec<FieldDescription> {
    FormField::ALL
        .into_iter()
        .map(|field| FieldDescription {
            name: field.wire_name(),
            label: field.label(),
            required: field.is_required(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_form_sets_fields_by_wire_name() {
        let form = load_form(r#"{"bl": "MSCU1234567", "returnTerminalCity": "Santos"}"#).unwrap();
        assert_eq!(form.field(FormField::Bl), "MSCU1234567");
        assert_eq!(form.field(FormField::ReturnTerminalCity), "Santos");
        assert_eq!(form.field(FormField::ConsigneeData), "");
    }

    #[test]
    fn load_form_rejects_unknown_and_non_string_values() {
        assert!(load_form(r#"{"vessel": "x"}"#).is_err());
        assert!(load_form(r#"{"bl": 42}"#).is_err());
        assert!(load_form("[]").is_err());
    }

    #[tokio::test]
    async fn load_attachment_guesses_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.4")
            .unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.name, "report.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.size(), 8);
    }

    #[tokio::test]
    async fn load_attachment_falls_back_to_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evidence.unknownext");
        std::fs::write(&path, b"data").unwrap();

        let attachment = load_attachment(&path).await.unwrap();
        assert_eq!(attachment.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn load_attachment_missing_file_fails() {
        assert!(load_attachment(Path::new("/nonexistent/file.pdf")).await.is_err());
    }

    #[test]
    fn preview_paths_share_one_submission_id() {
        let files = vec!["a.pdf".to_string(), "b report.png".to_string()];
        let preview = preview_paths("MSCU1234567", &files);

        assert_eq!(
            preview.paths,
            vec![
                format!("MSCU1234567/{}/1-a.pdf", preview.submission_id),
                format!("MSCU1234567/{}/2-b_report.png", preview.submission_id),
            ]
        );
    }

    #[test]
    fn outcome_report_uses_confirmation_text_on_success() {
        let report = OutcomeReport::from(&SubmissionOutcome::Success { locator: None });
        assert!(report.success);
        assert_eq!(report.message, SUCCESS_MESSAGE);

        let report = OutcomeReport::from(&SubmissionOutcome::Failure {
            message: "bad request".to_string(),
        });
        assert!(!report.success);
        assert_eq!(report.message, "bad request");
    }

    #[test]
    fn describe_fields_lists_every_field_once() {
        let fields = describe_fields();
        assert_eq!(fields.len(), FormField::ALL.len());
        assert_eq!(fields.iter().filter(|f| !f.required).count(), 1);
    }
}
