//! Integrity tokens
//!
//! Two flavours are produced:
//! - [`hash_token`]: SHA-256 over the serialized input with the current time in
//!   milliseconds appended. Calling it twice with the same input at different
//!   instants yields different tokens, so it is a uniqueness stamp only.
//! - [`content_token`]: BLAKE3 over the canonical JSON of the input. Stable for
//!   equal input and suitable as a content address (used for ledger chaining).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Length of a well-formed token: `0x` followed by 64 hex characters
pub const TOKEN_LEN: usize = 66;

/// Serialize input the way tokens expect: strings verbatim, everything else as JSON
fn serialize_input<T: Serialize + ?Sized>(input: &T) -> Result<String> {
    let value = serde_json::to_value(input)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => serde_json::to_string(&other)?,
    })
}

/// Time-salted integrity token
pub fn hash_token<T: Serialize + ?Sized>(input: &T, now: DateTime<Utc>) -> Result<String> {
    let mut data = serialize_input(input)?;
    data.push_str(&now.timestamp_millis().to_string());

    let digest = Sha256::digest(data.as_bytes());
    Ok(format!("0x{}", hex::encode(digest)))
}

/// Deterministic content token
pub fn content_token<T: Serialize + ?Sized>(input: &T) -> Result<String> {
    // `to_value` sorts object keys, which makes the encoding canonical.
    let canonical = serde_json::to_vec(&serde_json::to_value(input)?)?;
    Ok(format!("0x{}", blake3::hash(&canonical).to_hex()))
}

/// Check the `0x` + 64 hex characters shape
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token.starts_with("0x")
        && token[2..].chars().all(|c| c.is_ascii_hexdigit())
}
