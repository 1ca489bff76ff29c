use std::net::SocketAddr;
use std::path::PathBuf;

use crate::models::enums::{DuplicatePolicy, InvalidEnum, OverdrawPolicy};

/// Application-level constants
pub const APP_NAME: &str = "CPSS";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed page size for bill-sheet pages.
pub const RECORDS_PER_PAGE: i64 = 50;

/// Specialists at this level may enter past service dates.
pub const ADMIN_AUTH_LEVEL: i64 = 1;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "cpss_lib=info"
}

/// Get the application data directory (~/.cpss/)
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".cpss")
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join("cpss.db")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value}: {reason}")]
    BindAddr { value: String, reason: String },
    #[error(transparent)]
    Policy(#[from] InvalidEnum),
}

/// Business policies applied by the bill-sheet workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingRules {
    pub duplicate_policy: DuplicatePolicy,
    pub overdraw_policy: OverdrawPolicy,
}

impl Default for BillingRules {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::RejectDuplicates,
            overdraw_policy: OverdrawPolicy::Clamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub rules: BillingRules,
}

impl ServerConfig {
    /// Read `CPSS_BIND_ADDR`, `CPSS_DB_PATH`, `CPSS_DUPLICATE_POLICY` and
    /// `CPSS_OVERDRAW_POLICY`. Unset variables take their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_value = lookup("CPSS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_value.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::BindAddr {
                value: bind_value.clone(),
                reason: e.to_string(),
            }
        })?;

        let db_path = lookup("CPSS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let mut rules = BillingRules::default();
        if let Some(value) = lookup("CPSS_DUPLICATE_POLICY") {
            rules.duplicate_policy = value.parse()?;
        }
        if let Some(value) = lookup("CPSS_OVERDRAW_POLICY") {
            rules.overdraw_policy = value.parse()?;
        }

        Ok(Self {
            bind_addr,
            db_path,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_is_hidden_cpss_dir() {
        assert!(app_data_dir().ends_with(".cpss"));
        assert!(default_db_path().starts_with(app_data_dir()));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, default_db_path());
        assert_eq!(config.rules, BillingRules::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CPSS_BIND_ADDR", "0.0.0.0:9000"),
            ("CPSS_DB_PATH", "/tmp/billing.db"),
            ("CPSS_DUPLICATE_POLICY", "hold"),
            ("CPSS_OVERDRAW_POLICY", "reject"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.db_path, PathBuf::from("/tmp/billing.db"));
        assert_eq!(config.rules.duplicate_policy, DuplicatePolicy::Hold);
        assert_eq!(config.rules.overdraw_policy, OverdrawPolicy::Reject);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("CPSS_OVERDRAW_POLICY", "allow_negative")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Policy(_)));
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("CPSS_BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }
}
