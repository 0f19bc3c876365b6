//! Shared key generation for storage backends.
//!
//! Key format: `{shipment}/{submission_id}/{position}-{filename}`.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

/// Prefix used when the shipment identifier is blank.
pub const UNASSIGNED_SHIPMENT: &str = "unassigned";

/// Replace every character outside `[A-Za-z0-9-._]` with `_`, one for one.
pub fn sanitize_path_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Storage key for the attachment at 1-based `position` of a submission.
///
/// Same inputs always give the same key; positions keep keys distinct inside
/// one submission even when file names repeat.
pub fn attachment_storage_key(
    shipment: &str,
    submission_id: Uuid,
    position: usize,
    filename: &str,
) -> String {
    let shipment = shipment.trim();
    let shipment = if shipment.is_empty() {
        UNASSIGNED_SHIPMENT.to_string()
    } else {
        let sanitized = sanitize_path_component(shipment);
        // `.` and `..` are path segments, not names
        if sanitized.chars().all(|c| c == '.') {
            "_".repeat(sanitized.len())
        } else {
            sanitized
        }
    };
    format!(
        "{}/{}/{}-{}",
        shipment,
        submission_id,
        position,
        sanitize_path_component(filename)
    )
}

/// Reject keys that could escape the bucket or storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty()
        || storage_key.starts_with('/')
        || storage_key.split('/').any(|segment| segment == "..")
    {
        return Err(StorageError::InvalidKey(storage_key.to_string()));
    }
    Ok(())
}
