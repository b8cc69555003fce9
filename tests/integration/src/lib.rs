//! Cross-crate scenarios for the SkyChain backend
//!
//! These tests run the fleet service against real SQLite files:
//! - work order lifecycle and its follow-ups on aircraft and mechanics
//! - work order numbering under concurrent writers
//! - part verification and ledger continuity across reopen

pub mod test_utils;

#[cfg(test)]
mod lifecycle_tests;

#[cfg(test)]
mod numbering_tests;

#[cfg(test)]
mod ledger_tests;
