//! Encode/decode between slice state and durable text records.
//!
//! Decode never fails: a missing record, invalid JSON, or a shape
//! mismatch all yield `None`, and the caller keeps the slice's built-in
//! default. Encode always succeeds for well-formed in-memory state.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PersistError;

/// Encode one slice's state as a JSON record.
///
/// # Errors
///
/// Returns [`PersistError::Encode`] if serialization fails, which for
/// the slice types in this crate indicates a bug rather than bad data.
pub fn encode<T: Serialize>(key: &'static str, value: &T) -> Result<String, PersistError> {
    serde_json::to_string(value).map_err(|source| PersistError::Encode { key, source })
}

/// Decode a stored record into a slice state.
///
/// Returns `None` for an absent record, invalid JSON, or JSON that does
/// not match the expected shape. Failures are logged at debug level;
/// they are an expected consequence of format drift and hand-edited
/// storage, not an error condition.
#[must_use]
pub fn decode<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::debug!(key, %error, "discarding undecodable record");
            None
        }
    }
}
