//! SQLite helper utilities for type conversion
//!
//! SQLite has no array or timestamp types, so lists are stored as JSON text and
//! timestamps as RFC 3339 strings.

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

/// Serialize a slice to a JSON string for SQLite storage
#[inline]
pub fn vec_to_json<T: Serialize>(v: &[T]) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a JSON string from SQLite to a Vec (empty on malformed input)
#[inline]
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Vec<T> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Get current UTC timestamp as an RFC 3339 string
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Whether an error chain bottoms out in a SQLite UNIQUE constraint failure
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .is_some_and(|db_err| db_err.is_unique_violation())
    })
}
