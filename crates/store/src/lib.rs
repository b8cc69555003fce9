//! Persistence for SkyChain
//!
//! A single SQLite database holds aircraft, parts, work orders, mechanics and
//! the chained transaction ledger. See [`Store`] for the transaction model.

pub mod aircraft;
pub mod error;
pub mod ledger;
pub mod maintenance;
pub mod mechanics;
pub mod parts;
pub mod query;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use aircraft::AircraftFilter;
pub use error::{Result, StoreError};
pub use ledger::{LedgerHealth, TransactionFilter, GENESIS_HASH};
pub use maintenance::WorkOrderFilter;
pub use mechanics::MechanicFilter;
pub use parts::PartFilter;
pub use query::{Page, PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use store::{Store, Tx};
