//! SkyChain fleet operations
//!
//! [`FleetService`] is the single entry point the API layer talks to. It
//! validates requests, applies the domain rules, and persists every
//! multi-entity change in one store transaction together with its ledger
//! record.

pub mod aircraft;
pub mod analytics;
pub mod error;
pub mod ledger;
pub mod maintenance;
pub mod mechanics;
pub mod parts;
pub mod service;
pub mod sweep;
pub mod views;

pub use error::{FleetError, Result};
pub use service::{FleetService, FleetSettings};
pub use views::{
    AircraftView, ContractOutcome, MechanicDetail, MechanicView, NetworkOverview, PartView,
    PerformanceOutcome, ScanOutcome, SignatureOutcome, SweepReport, TransactionSummary,
    VerificationOutcome, WorkOrderView,
};
