//! Configuration management for SkyChain.
//!
//! Configuration is read from a TOML file when `SKYCHAIN_CONFIG` names one and
//! otherwise starts from [`Config::default_config`]. A small set of environment
//! variables override individual fields afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

/// Deployment environment; controls whether internal error detail is exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file; `:memory:` keeps everything in process
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub verifier: VerifierKind,
    /// Uniform draws at or below this value fail verification
    pub authenticity_threshold: f64,
    /// Recipient recorded on registration ledger entries
    pub aircraft_contract_address: String,
}

/// Which authenticity verifier strategy the service wires in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifierKind {
    Random,
    AlwaysAuthentic,
    AlwaysCounterfeit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Seconds between background status sweeps; 0 disables the task
    pub status_sweep_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: Environment::Development,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/skychain.db"),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            verifier: VerifierKind::Random,
            authenticity_threshold: 0.05,
            aircraft_contract_address: "0x0000000000000000000000000000000000000000".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Plain,
            level: default_log_level(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            status_sweep_secs: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            chain: ChainConfig::default(),
            logging: LoggingConfig::default(),
            maintenance: MaintenanceConfig::default(),
        }
    }

    /// Load from `SKYCHAIN_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("SKYCHAIN_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default_config(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid PORT: {}", port)))?;
        }
        if let Some(path) = lookup("SKYCHAIN_DB_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(env) = lookup("SKYCHAIN_ENV") {
            self.server.environment = match env.as_str() {
                "development" => Environment::Development,
                "production" => Environment::Production,
                other => {
                    return Err(CoreError::Config(format!("invalid SKYCHAIN_ENV: {}", other)))
                }
            };
        }
        if let Some(format) = lookup("SKYCHAIN_LOG_FORMAT") {
            self.logging.format = match format.as_str() {
                "plain" => LogFormat::Plain,
                "json" => LogFormat::Json,
                other => {
                    return Err(CoreError::Config(format!(
                        "invalid SKYCHAIN_LOG_FORMAT: {}",
                        other
                    )))
                }
            };
        }
        if let Some(level) = lookup("SKYCHAIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(verifier) = lookup("SKYCHAIN_VERIFIER") {
            self.chain.verifier = match verifier.as_str() {
                "random" => VerifierKind::Random,
                "always-authentic" => VerifierKind::AlwaysAuthentic,
                "always-counterfeit" => VerifierKind::AlwaysCounterfeit,
                other => {
                    return Err(CoreError::Config(format!(
                        "invalid SKYCHAIN_VERIFIER: {}",
                        other
                    )))
                }
            };
        }
        if let Some(secs) = lookup("SKYCHAIN_SWEEP_SECS") {
            self.maintenance.status_sweep_secs = secs
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid SKYCHAIN_SWEEP_SECS: {}", secs)))?;
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.server.environment == Environment::Development
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.chain.verifier, VerifierKind::Random);
        assert!((config.chain.authenticity_threshold - 0.05).abs() < f64::EPSILON);
        assert!(config.is_development());
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            environment = "production"

            [chain]
            verifier = "always-authentic"
            authenticity_threshold = 0.1
            aircraft_contract_address = "0xabc"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(!config.is_development());
        assert_eq!(config.chain.verifier, VerifierKind::AlwaysAuthentic);
        assert_eq!(config.logging.format, LogFormat::Plain);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.maintenance.status_sweep_secs, 300);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9001"),
            ("SKYCHAIN_DB_PATH", ":memory:"),
            ("SKYCHAIN_ENV", "production"),
            ("SKYCHAIN_LOG_FORMAT", "json"),
            ("SKYCHAIN_LOG_LEVEL", "debug"),
            ("SKYCHAIN_VERIFIER", "always-counterfeit"),
            ("SKYCHAIN_SWEEP_SECS", "0"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default_config();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9001);
        assert_eq!(config.storage.database_path, PathBuf::from(":memory:"));
        assert_eq!(config.server.environment, Environment::Production);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.chain.verifier, VerifierKind::AlwaysCounterfeit);
        assert_eq!(config.maintenance.status_sweep_secs, 0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = Config::default_config();
        let result = config.apply_overrides(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("skychain_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[storage]\ndatabase_path = \"/tmp/fleet.db\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/fleet.db"));

        std::fs::remove_file(path).ok();
    }
}
