//! Domain module for SkyChain fleet maintenance
//!
//! This crate contains pure domain logic with no I/O dependencies:
//! - Entity definitions (aircraft, parts, work orders, mechanics, ledger records)
//! - Status derivation for aircraft and work orders
//! - The work-order lifecycle and its follow-up effects
//! - Analytics rollups
//! - Request validation
//!
//! Every rule that depends on time takes `now` as an argument.

pub mod aircraft;
pub mod analytics;
pub mod error;
pub mod maintenance;
pub mod mechanic;
pub mod part;
pub mod requests;
pub mod transaction;
pub mod validation;
pub mod work_order;

pub use aircraft::{days_until, Aircraft, AircraftStatus, ComplianceStatus, DigitalTwin};
pub use error::{DomainError, Result};
pub use maintenance::{
    derive_status, BlockchainRecord, ChecklistItem, Compliance, ComplianceCheck, Cost,
    DigitalSignature, Documentation, FollowUp, MaintenanceStatus, MaintenanceType, PartAction,
    PartActionKind, Priority, StatusTransition, WorkOrder,
};
pub use mechanic::{
    Availability, AvailabilityStatus, Certification, CertificationStatus, Mechanic, Performance,
    PerformanceUpdate, WorkHistoryEntry,
};
pub use part::{Authenticity, Inspection, Lifecycle, Part, PartStatus, Specifications};
pub use transaction::{
    EntityType, LedgerTransaction, RelatedEntity, TransactionStatus, TransactionType,
};
pub use work_order::{format_work_order, parse_work_order, WORK_ORDER_PREFIX};
