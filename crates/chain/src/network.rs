//! Simulated chain activity
//!
//! Contract execution and network statistics are generated locally. Numbers
//! fall in plausible ranges but mean nothing.

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::token::hash_token;

/// Base gas price in gwei
const BASE_GAS_PRICE_GWEI: i64 = 20;

/// Outcome of a simulated contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractExecution {
    /// Time-salted transaction token
    pub transaction_hash: String,
    /// Block number in `[1_000_000, 2_000_000)`
    pub block_number: u64,
    /// Gas used in `[21_000, 121_000)`
    pub gas_used: u64,
    /// Always `success`
    pub status: String,
}

/// Simulated network figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    /// Current block height
    pub block_height: u64,
    /// Hash rate label, e.g. `172.4 TH/s`
    pub hash_rate: String,
    /// Gas price label, e.g. `21 gwei`
    pub gas_price: String,
    /// Uptime label
    pub network_uptime: String,
    /// Lifetime transaction count
    pub total_transactions: u64,
    /// Average block time label
    pub avg_block_time: String,
}

/// Simulate calling `method` on `contract_address`
pub fn execute_contract(
    contract_address: &str,
    method: &str,
    params: &serde_json::Value,
    now: DateTime<Utc>,
) -> Result<ContractExecution> {
    let transaction_hash = hash_token(
        &json!({
            "contract": contract_address,
            "method": method,
            "params": params,
            "timestamp": now.timestamp_millis(),
        }),
        now,
    )?;

    let mut rng = rand::thread_rng();
    let execution = ContractExecution {
        transaction_hash,
        block_number: rng.gen_range(1_000_000..2_000_000),
        gas_used: rng.gen_range(21_000..121_000),
        status: "success".to_string(),
    };

    debug!(
        contract = contract_address,
        method,
        block_number = execution.block_number,
        "Simulated contract execution"
    );

    Ok(execution)
}

/// Simulated gas price in gwei: 20 ± 5, never below 1
pub fn calculate_gas_price() -> u64 {
    let variation: f64 = rand::thread_rng().gen_range(-5.0..5.0);
    ((BASE_GAS_PRICE_GWEI as f64 + variation).floor() as i64).max(1) as u64
}

/// Simulated network statistics
pub fn network_stats() -> NetworkStats {
    let mut rng = rand::thread_rng();
    NetworkStats {
        block_height: rng.gen_range(2_800_000..2_900_000),
        hash_rate: format!("{:.1} TH/s", rng.gen_range(150.0..200.0)),
        gas_price: format!("{} gwei", calculate_gas_price()),
        network_uptime: "99.99%".to_string(),
        total_transactions: rng.gen_range(1_200_000..1_300_000),
        avg_block_time: "2.3s".to_string(),
    }
}

/// Random 32-byte block hash, `0x`-prefixed
pub fn random_block_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}
