//! Identifier validators

use crate::core::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

/// Longest identifier the backend accepts, in bytes
pub const MAX_DOCUMENT_ID_LEN: usize = 1500;

/// Validator: `id` can name a document in a collection
///
/// Identifiers are opaque, but they are path segments: no `/`, not `.` or
/// `..`, not empty, and bounded in length.
pub fn validate_document_id(id: &str) -> Result<(), ValidationError> {
    static SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SEGMENT_REGEX.get_or_init(|| Regex::new(r"^[^/\s]+$").unwrap());

    let valid = id.len() <= MAX_DOCUMENT_ID_LEN && id != "." && id != ".." && regex.is_match(id);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier { id: id.to_string() })
    }
}
