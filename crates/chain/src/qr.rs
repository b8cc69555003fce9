//! QR payload encoding
//!
//! Rendering an actual QR image happens outside this system. The encoder
//! produces the opaque string stored on aircraft and parts and matched by
//! `scan-qr` lookups.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

use crate::error::{ChainError, Result};

const DATA_URL_PREFIX: &str = "data:application/json;base64,";

/// Turns a JSON payload into an opaque QR string
pub trait QrEncoder: Send + Sync {
    /// Encode `payload`
    fn encode(&self, payload: &Value) -> Result<String>;
}

/// Encodes the payload as a base64 JSON data URL
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUrlQrEncoder;

impl DataUrlQrEncoder {
    /// Recover the JSON payload from an encoded string
    pub fn decode(encoded: &str) -> Result<Value> {
        let body = encoded
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or_else(|| ChainError::InvalidPayload("missing data URL prefix".to_string()))?;
        let bytes = STANDARD
            .decode(body)
            .map_err(|e| ChainError::InvalidPayload(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl QrEncoder for DataUrlQrEncoder {
    fn encode(&self, payload: &Value) -> Result<String> {
        let json = serde_json::to_vec(payload)?;
        Ok(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(json)))
    }
}
