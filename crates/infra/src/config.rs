//! Configuration loading and representation.
//!
//! Everything comes from environment variables with sensible defaults:
//!
//! | variable | values | default |
//! |---|---|---|
//! | `STOCKFLOW_STORE` | `memory`, `file` | `memory` |
//! | `STOCKFLOW_DATA_FILE` | path | `stockflow.json` |
//! | `STOCKFLOW_FULL_TRANSFER` | `repoint`, `recreate` | `repoint` |
//! | `STOCKFLOW_NOTIFY_SECS` | positive integer | `3` |
//! | `STOCKFLOW_LOG_FORMAT` | `pretty`, `json` | `pretty` |
//!
//! Log filtering itself is read by the subscriber from `RUST_LOG`.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use stockflow_inventory::FullTransfer;

use crate::ledger::LedgerSettings;
use crate::notifier::Notifier;

pub const ENV_STORE: &str = "STOCKFLOW_STORE";
pub const ENV_DATA_FILE: &str = "STOCKFLOW_DATA_FILE";
pub const ENV_FULL_TRANSFER: &str = "STOCKFLOW_FULL_TRANSFER";
pub const ENV_NOTIFY_SECS: &str = "STOCKFLOW_NOTIFY_SECS";
pub const ENV_LOG_FORMAT: &str = "STOCKFLOW_LOG_FORMAT";

const DEFAULT_DATA_FILE: &str = "stockflow.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid (expected {expected})")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which document store backs the ledger.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreBackend,
    pub data_file: PathBuf,
    pub full_transfer: FullTransfer,
    pub notify_secs: u32,
    /// Emit JSON log lines instead of compact human-readable ones.
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            full_transfer: FullTransfer::default(),
            notify_secs: Notifier::DEFAULT_TTL_SECS as u32,
            json_logs: false,
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(ENV_STORE) {
            config.store = match value.trim().to_ascii_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "file" => StoreBackend::File,
                _ => return Err(invalid(ENV_STORE, value, "memory or file")),
            };
        }

        if let Some(value) = lookup(ENV_DATA_FILE) {
            if value.trim().is_empty() {
                return Err(invalid(ENV_DATA_FILE, value, "a file path"));
            }
            config.data_file = PathBuf::from(value.trim());
        }

        if let Some(value) = lookup(ENV_FULL_TRANSFER) {
            config.full_transfer = match value.trim().to_ascii_lowercase().as_str() {
                "repoint" => FullTransfer::Repoint,
                "recreate" => FullTransfer::Recreate,
                _ => return Err(invalid(ENV_FULL_TRANSFER, value, "repoint or recreate")),
            };
        }

        if let Some(value) = lookup(ENV_NOTIFY_SECS) {
            config.notify_secs = match value.trim().parse::<u32>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(invalid(ENV_NOTIFY_SECS, value, "a positive number of seconds")),
            };
        }

        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            config.json_logs = match value.trim().to_ascii_lowercase().as_str() {
                "pretty" => false,
                "json" => true,
                _ => return Err(invalid(ENV_LOG_FORMAT, value, "pretty or json")),
            };
        }

        Ok(config)
    }

    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            full_transfer: self.full_transfer,
            notification_ttl: Duration::seconds(i64::from(self.notify_secs)),
        }
    }
}

fn invalid(var: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.ledger_settings(), LedgerSettings::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            (ENV_STORE, "File"),
            (ENV_DATA_FILE, "/tmp/items.json"),
            (ENV_FULL_TRANSFER, "recreate"),
            (ENV_NOTIFY_SECS, "5"),
            (ENV_LOG_FORMAT, "json"),
        ])
        .unwrap();

        assert_eq!(config.store, StoreBackend::File);
        assert_eq!(config.data_file, PathBuf::from("/tmp/items.json"));
        assert_eq!(config.full_transfer, FullTransfer::Recreate);
        assert_eq!(config.ledger_settings().notification_ttl, Duration::seconds(5));
        assert!(config.json_logs);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[(ENV_STORE, "postgres")]),
            Err(ConfigError::Invalid { var: ENV_STORE, .. })
        ));
        assert!(matches!(
            load(&[(ENV_NOTIFY_SECS, "0")]),
            Err(ConfigError::Invalid { var: ENV_NOTIFY_SECS, .. })
        ));
        assert!(load(&[(ENV_FULL_TRANSFER, "merge")]).is_err());
    }
}
