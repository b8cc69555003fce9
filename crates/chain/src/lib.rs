//! SkyChain pseudo-chain utilities
//!
//! Nothing in this crate talks to a blockchain. It produces the opaque tokens
//! the rest of the system stores as "proof" fields:
//! - Integrity tokens (`0x` + 64 hex chars) and deterministic content tokens
//! - Authenticity verification behind a pluggable [`AuthenticityVerifier`]
//! - Audit-trail signature stamps for work orders
//! - Cosmetic wallet identifiers
//! - QR payload encoding
//! - Simulated contract execution and network statistics
//!
//! None of these values carry a cryptographic guarantee.

#![warn(missing_docs)]

pub mod error;
pub mod network;
pub mod qr;
pub mod signature;
pub mod token;
pub mod verifier;
pub mod wallet;

pub use error::{ChainError, Result};
pub use network::{
    calculate_gas_price, execute_contract, network_stats, random_block_hash, ContractExecution,
    NetworkStats,
};
pub use qr::{DataUrlQrEncoder, QrEncoder};
pub use signature::{signature_stamp, SignatureInput};
pub use token::{content_token, hash_token, is_well_formed_token, TOKEN_LEN};
pub use verifier::{AuthenticityVerifier, FixedVerifier, RandomThresholdVerifier};
pub use wallet::{generate_private_key, generate_wallet_address};
