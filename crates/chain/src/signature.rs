//! Work-order signature stamps
//!
//! A stamp is a SHA-256 digest over the canonical JSON of the signing context.
//! It is an audit-trail marker: anyone holding the same inputs can recompute
//! it, so it proves nothing about who produced it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Inputs bound into a signature stamp
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInput {
    /// Human-readable work order number
    pub work_order: String,
    /// Signing mechanic
    pub mechanic_id: String,
    /// Countersigning supervisor
    pub supervisor_id: String,
    /// Signing instant
    pub timestamp: DateTime<Utc>,
    /// Work order type label
    pub maintenance_type: String,
    /// Owning aircraft
    pub aircraft_id: String,
    /// Number of completed checklist items at signing time
    pub completed_tasks: usize,
}

/// Compute the `0x`-prefixed stamp for `input`
pub fn signature_stamp(input: &SignatureInput) -> Result<String> {
    let canonical = serde_json::to_vec(&serde_json::to_value(input)?)?;
    Ok(format!("0x{}", hex::encode(Sha256::digest(&canonical))))
}
