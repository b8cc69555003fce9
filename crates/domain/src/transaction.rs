//! Pseudo-ledger transaction records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gas price recorded on every simulated transaction, in wei (20 gwei)
pub const DEFAULT_GAS_PRICE_WEI: &str = "20000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    AircraftRegistration,
    PartAuthentication,
    MaintenanceRecord,
    MechanicSignature,
    ComplianceCheck,
    SmartContractDeployment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::AircraftRegistration => "aircraft_registration",
            TransactionType::PartAuthentication => "part_authentication",
            TransactionType::MaintenanceRecord => "maintenance_record",
            TransactionType::MechanicSignature => "mechanic_signature",
            TransactionType::ComplianceCheck => "compliance_check",
            TransactionType::SmartContractDeployment => "smart_contract_deployment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aircraft_registration" => Some(TransactionType::AircraftRegistration),
            "part_authentication" => Some(TransactionType::PartAuthentication),
            "maintenance_record" => Some(TransactionType::MaintenanceRecord),
            "mechanic_signature" => Some(TransactionType::MechanicSignature),
            "compliance_check" => Some(TransactionType::ComplianceCheck),
            "smart_contract_deployment" => Some(TransactionType::SmartContractDeployment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TransactionStatus::Pending),
            "confirmed" => Some(TransactionStatus::Confirmed),
            "failed" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Aircraft,
    Part,
    Maintenance,
    Mechanic,
    /// Free-standing contract calls
    Contract,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Aircraft => "Aircraft",
            EntityType::Part => "Part",
            EntityType::Maintenance => "Maintenance",
            EntityType::Mechanic => "Mechanic",
            EntityType::Contract => "Contract",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Aircraft" => Some(EntityType::Aircraft),
            "Part" => Some(EntityType::Part),
            "Maintenance" => Some(EntityType::Maintenance),
            "Mechanic" => Some(EntityType::Mechanic),
            "Contract" => Some(EntityType::Contract),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    pub entity_type: EntityType,
    pub entity_id: String,
}

/// One simulated chain transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    /// Unique
    pub transaction_hash: String,
    pub block_number: u64,
    pub block_hash: String,
    pub from: String,
    pub to: String,
    pub gas_used: u64,
    /// Wei, as a decimal string
    pub gas_price: String,
    pub value: String,
    pub contract_address: Option<String>,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub related_entity: RelatedEntity,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub confirmations: u32,
    pub network_fee: String,
}

impl LedgerTransaction {
    /// Fee in wei: `gas_used * gas_price`, or `"0"` when the price does not parse
    pub fn compute_network_fee(gas_used: u64, gas_price: &str) -> String {
        gas_price
            .parse::<u128>()
            .map(|price| (price * gas_used as u128).to_string())
            .unwrap_or_else(|_| "0".to_string())
    }
}
