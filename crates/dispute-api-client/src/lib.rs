//! HTTP client for the dispute backend.
//!
//! Provides a minimal client bound to the submission endpoint, a generic
//! response handler that turns any non-2xx into an `ApiError` carrying the
//! backend's own message, and the two submission encodings (see `api`).

pub mod api;

use dispute_core::DisputeError;
use reqwest::header::LOCATION;
use reqwest::Client;
use std::time::Duration;

pub use api::DisputePayload;

/// Properties checked, in order, for an error message in a JSON error body.
const ERROR_MESSAGE_KEYS: [&str; 4] = ["error", "erro", "message", "mensagem"];

/// Properties checked, in order, for the created resource in a JSON success body.
const LOCATOR_KEYS: [&str; 2] = ["url", "location"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Status { status, .. } => Some(*status),
        }
    }
}

impl From<ApiError> for DisputeError {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        let message = match err {
            ApiError::Transport(e) => Some(e.to_string()),
            ApiError::Status { message, .. } => message,
        };
        DisputeError::Submission { status, message }
    }
}

/// Backend acknowledgement of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub status: u16,
    /// Created resource, from the `Location` header or a JSON `url`/`location`.
    pub locator: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// HTTP client for the dispute submission endpoint.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    endpoint_url: String,
}

impl ApiClient {
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// POST a JSON body to the submission endpoint.
    pub async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<SubmissionReceipt, ApiError> {
        let request = self.client.post(&self.endpoint_url).json(body);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// POST a multipart form to the submission endpoint.
    pub async fn post_multipart(
        &self,
        form: reqwest::multipart::Form,
    ) -> Result<SubmissionReceipt, ApiError> {
        let request = self.client.post(&self.endpoint_url).multipart(form);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: reqwest::Response) -> Result<SubmissionReceipt, ApiError> {
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %text, "Backend rejected submission");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let body = serde_json::from_str::<serde_json::Value>(&text).ok();
        let locator = location.or_else(|| body.as_ref().and_then(find_locator));

        Ok(SubmissionReceipt {
            status: status.as_u16(),
            locator,
            body,
        })
    }
}

/// Message for the user from an error body: a known JSON property when the body
/// is JSON, else the trimmed raw text. `None` for an empty body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ERROR_MESSAGE_KEYS {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                if !message.trim().is_empty() {
                    return Some(message.trim().to_string());
                }
            }
        }
    }

    Some(trimmed.to_string())
}

fn find_locator(body: &serde_json::Value) -> Option<String> {
    LOCATOR_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
