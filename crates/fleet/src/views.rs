//! Response shapes
//!
//! Entities are returned with their read-time figures (days until maintenance,
//! checklist completion, overall performance) flattened alongside.

use chrono::{DateTime, Utc};
use serde::Serialize;
use skychain_chain::{ContractExecution, NetworkStats};
use skychain_domain::{
    Aircraft, BlockchainRecord, DigitalSignature, LedgerTransaction, Mechanic, Part,
    PartStatus, Performance, TransactionStatus, TransactionType, WorkOrder,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftView {
    #[serde(flatten)]
    pub aircraft: Aircraft,
    pub days_until_maintenance: i64,
}

impl AircraftView {
    pub fn new(aircraft: Aircraft, now: DateTime<Utc>) -> Self {
        Self {
            days_until_maintenance: aircraft.days_until_maintenance(now),
            aircraft,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartView {
    #[serde(flatten)]
    pub part: Part,
    pub days_until_inspection: i64,
}

impl PartView {
    pub fn new(part: Part, now: DateTime<Utc>) -> Self {
        Self {
            days_until_inspection: part.days_until_inspection(now),
            part,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderView {
    #[serde(flatten)]
    pub order: WorkOrder,
    pub completion_percentage: u32,
}

impl From<WorkOrder> for WorkOrderView {
    fn from(order: WorkOrder) -> Self {
        Self {
            completion_percentage: order.completion_percentage(),
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicView {
    #[serde(flatten)]
    pub mechanic: Mechanic,
    pub overall_performance: u32,
}

impl From<Mechanic> for MechanicView {
    fn from(mechanic: Mechanic) -> Self {
        Self {
            overall_performance: mechanic.overall_performance(),
            mechanic,
        }
    }
}

/// Mechanic with their scheduled and in-progress work
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicDetail {
    #[serde(flatten)]
    pub mechanic: MechanicView,
    pub current_tasks: Vec<WorkOrderView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub part_id: String,
    pub is_authentic: bool,
    pub status: PartStatus,
    pub verification_date: DateTime<Utc>,
    pub blockchain_proof: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub part: PartView,
    pub is_authentic: bool,
    pub scan_timestamp: DateTime<Utc>,
    /// `verified` or `failed`
    pub verification_status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureOutcome {
    pub digital_signature: DigitalSignature,
    pub blockchain_record: BlockchainRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceOutcome {
    pub performance: Performance,
    pub rating: f64,
    pub reputation_score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractOutcome {
    pub success: bool,
    pub transaction: ContractExecution,
    pub record: LedgerTransaction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub transaction_hash: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl From<&LedgerTransaction> for TransactionSummary {
    fn from(tx: &LedgerTransaction) -> Self {
        Self {
            transaction_hash: tx.transaction_hash.clone(),
            kind: tx.kind,
            timestamp: tx.timestamp,
            status: tx.status,
        }
    }
}

/// Simulated network figures with the stored transaction count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOverview {
    #[serde(flatten)]
    pub stats: NetworkStats,
    pub recent_transactions: Vec<TransactionSummary>,
}

/// Outcome of a status reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub aircraft_updated: usize,
    pub work_orders_updated: usize,
    pub work_orders_completed: usize,
    pub certifications_expired: usize,
}
