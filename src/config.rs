//! Environment configuration
//!
//! Values come from the process environment (optionally a `.env` file loaded
//! by the binaries).

use crate::error::TriageError;
use crate::Result;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://complaints.db";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SENDER: &str = "support@bank.example";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// HTTP mail relay; `None` means notifications are only logged
    pub mail_relay_url: Option<String>,
    pub mail_sender: String,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            mail_relay_url: None,
            mail_sender: DEFAULT_SENDER.to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| TriageError::ConfigError(format!("Invalid port '{}': {}", raw, e)))?,
            None => defaults.port,
        };

        let bcrypt_cost = match non_empty("BCRYPT_COST") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                TriageError::ConfigError(format!("Invalid BCRYPT_COST '{}': {}", raw, e))
            })?,
            None => defaults.bcrypt_cost,
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL").unwrap_or(defaults.database_url),
            port,
            mail_relay_url: non_empty("MAIL_RELAY_URL"),
            mail_sender: non_empty("MAIL_SENDER").unwrap_or(defaults.mail_sender),
            bcrypt_cost,
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides_and_port_fallback() {
        let config = AppConfig::from_lookup(lookup(&[
            ("API_PORT", "9090"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("MAIL_RELAY_URL", "http://relay.local/send"),
            ("BCRYPT_COST", "6"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.mail_relay_url.as_deref(), Some("http://relay.local/send"));
        assert_eq!(config.bcrypt_cost, 6);
    }

    #[test]
    fn test_port_takes_precedence() {
        let config =
            AppConfig::from_lookup(lookup(&[("PORT", "8081"), ("API_PORT", "9090")])).unwrap();
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, TriageError::ConfigError(_)));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("MAIL_RELAY_URL", "  ")])).unwrap();
        assert_eq!(config.mail_relay_url, None);
    }
}
