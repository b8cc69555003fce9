//! Core functionality for the SkyChain fleet-maintenance backend.
//!
//! This crate provides the ambient pieces every other SkyChain crate leans on:
//! the shared error type, structured logging setup, service configuration and
//! the injectable clock used by all status derivations.

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use config::{
    ChainConfig, Config, Environment, LogFormat, LoggingConfig, MaintenanceConfig, ServerConfig,
    StorageConfig, VerifierKind,
};
pub use error::{CoreError, Result};
