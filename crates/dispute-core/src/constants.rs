//! User-facing texts and wire constants shared by the form and the pipeline.

/// Multipart part name carrying each attached file.
pub const MULTIPART_FILE_FIELD: &str = "arquivo";

/// JSON property listing the public locator of every uploaded file.
pub const ATTACHMENT_URLS_PROPERTY: &str = "attachmentUrls";

/// Validation message when no file is attached.
pub const NO_ATTACHMENTS_MESSAGE: &str = "Please attach at least one document.";

/// Validation message when a required field is empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in every required field.";

/// Aggregated message when one or more uploads to the storage sink failed.
pub const UPLOAD_FAILED_MESSAGE: &str =
    "One or more attachments could not be uploaded. Please try again.";

/// Fallback when the backend gives no usable error text.
pub const GENERIC_RETRY_MESSAGE: &str = "Failed to send. Please try again.";

/// Confirmation shown once the backend acknowledged the request.
pub const SUCCESS_MESSAGE: &str = "Request sent! We received your information and documents. \
     Our team will review the dispute and contact you shortly.";

/// Advisory text next to the file picker. Nothing enforces it.
pub const ATTACHMENT_ADVICE: &str =
    "Attach evidence (you can add several files). Pick again to add more files.";
