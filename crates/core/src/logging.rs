//! Tracing subscriber setup for SkyChain binaries.
//!
//! `RUST_LOG` takes precedence over the configured level so an operator can
//! raise verbosity for one run without touching the config file.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{CoreError, Result};

/// Build the level filter from a `RUST_LOG` value or the configured directives
fn level_filter(rust_log: Option<&str>, configured: &str) -> Result<EnvFilter> {
    let directives = rust_log.filter(|v| !v.trim().is_empty()).unwrap_or(configured);
    EnvFilter::try_new(directives)
        .map_err(|e| CoreError::Logging(format!("invalid log filter '{}': {}", directives, e)))
}

/// Install the global subscriber described by `config`.
///
/// Fails if the filter does not parse or a subscriber is already installed.
///
/// ```no_run
/// use skychain_core::{logging, Config};
///
/// let config = Config::default_config();
/// logging::init(&config.logging).unwrap();
/// tracing::info!(service = "skychain-api", "Service started");
/// ```
pub fn init(config: &LoggingConfig) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = level_filter(rust_log.as_deref(), &config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Plain => registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init(),
    };
    installed.map_err(|e| CoreError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_used_without_rust_log() {
        let filter = level_filter(None, "info,skychain_store=debug").unwrap();
        assert!(filter.to_string().to_lowercase().contains("skychain_store=debug"));
    }

    #[test]
    fn test_rust_log_overrides_configured_level() {
        let filter = level_filter(Some("warn"), "debug").unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "warn");

        // Blank RUST_LOG counts as unset
        let filter = level_filter(Some("  "), "debug").unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "debug");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let err = level_filter(None, "skychain_fleet=loudest").unwrap_err();
        assert!(matches!(err, CoreError::Logging(ref m) if m.contains("skychain_fleet=loudest")));
    }
}
