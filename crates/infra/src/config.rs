//! Configuration loading and representation.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use vivaha_ledger::{Amount, DEFAULT_BUDGET};

pub const DEFAULT_DATA_FILE: &str = "data/expenses.json";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
    pub initial_budget: Amount,
    pub store: StoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            initial_budget: DEFAULT_BUDGET,
            store: StoreKind::File,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    ///
    /// `VIVAHA_BIND_ADDR` wins over `PORT`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("VIVAHA_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }

        if let Some(addr) = get("VIVAHA_BIND_ADDR") {
            config.bind_addr = addr
                .trim()
                .parse()
                .map_err(|e: std::net::AddrParseError| invalid("VIVAHA_BIND_ADDR", &addr, e))?;
        } else if let Some(port) = get("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("PORT", &port, e))?;
            config.bind_addr.set_port(port);
        }

        if let Some(budget) = get("VIVAHA_INITIAL_BUDGET") {
            let value: Amount = budget
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| invalid("VIVAHA_INITIAL_BUDGET", &budget, e))?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid("VIVAHA_INITIAL_BUDGET", &budget, "must be non-negative"));
            }
            config.initial_budget = value;
        }

        if let Some(store) = get("VIVAHA_STORE") {
            config.store = match store.trim().to_lowercase().as_str() {
                "file" => StoreKind::File,
                "memory" => StoreKind::Memory,
                _ => return Err(invalid("VIVAHA_STORE", &store, "expected file or memory")),
            };
        }

        Ok(config)
    }
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name: &str| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.initial_budget, 50_000.0);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("VIVAHA_DATA_FILE", "/tmp/ledger.json"),
            ("VIVAHA_BIND_ADDR", "127.0.0.1:8088"),
            ("PORT", "9999"),
            ("VIVAHA_INITIAL_BUDGET", "75000"),
            ("VIVAHA_STORE", "Memory"),
        ]))
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/ledger.json"));
        assert_eq!(config.bind_addr, "127.0.0.1:8088".parse::<SocketAddr>().unwrap());
        assert_eq!(config.initial_budget, 75_000.0);
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn port_applies_without_bind_addr() {
        let config = Config::from_lookup(lookup(&[("PORT", "4000"), ("VIVAHA_BIND_ADDR", " ")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:4000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_malformed_values() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = Config::from_lookup(lookup(&[("VIVAHA_INITIAL_BUDGET", "-5")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "VIVAHA_INITIAL_BUDGET", .. }));

        let err = Config::from_lookup(lookup(&[("VIVAHA_STORE", "redis")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "VIVAHA_STORE", .. }));
    }
}
