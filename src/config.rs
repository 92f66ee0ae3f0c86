//! Configuration management for the arbitrage scanner.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Uses envy for deserialization from env vars.

use crate::error::{Result, ScannerError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Scanner configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds between automatic refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Whether auto-refresh starts enabled.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,

    /// Deadline for one snapshot fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Minimum profit percentage an opportunity must strictly exceed.
    #[serde(default = "default_profit_threshold")]
    pub profit_threshold: Decimal,

    /// Artificial latency of the simulated feed, in milliseconds.
    #[serde(default = "default_sim_latency_ms")]
    pub sim_latency_ms: u64,

    /// HTTP API port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_auto_refresh() -> bool {
    true
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_profit_threshold() -> Decimal {
    // 0.3 percent
    Decimal::new(3, 1)
}

fn default_sim_latency_ms() -> u64 {
    500
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            auto_refresh: default_auto_refresh(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            profit_threshold: default_profit_threshold(),
            sim_latency_ms: default_sim_latency_ms(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one exists.
    pub fn load() -> std::result::Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
    }

    /// Load and validate in one step.
    pub fn load_checked() -> Result<Self> {
        let config = Config::load()?;
        config.validate().map_err(ScannerError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.refresh_interval_secs == 0 {
            return Err("REFRESH_INTERVAL_SECS must be greater than 0".to_string());
        }
        if self.fetch_timeout_ms == 0 {
            return Err("FETCH_TIMEOUT_MS must be greater than 0".to_string());
        }
        if self.profit_threshold < Decimal::ZERO {
            return Err("PROFIT_THRESHOLD must not be negative".to_string());
        }
        Ok(())
    }

    /// Auto-refresh period as a Duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Fetch deadline as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.refresh_interval_secs, 5);
        assert!(config.auto_refresh);
        assert_eq!(config.fetch_timeout_ms, 10_000);
        assert_eq!(config.profit_threshold, dec!(0.3));
        assert_eq!(config.sim_latency_ms, 500);
        assert_eq!(config.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let config = Config {
            refresh_interval_secs: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("REFRESH_INTERVAL_SECS"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = Config {
            fetch_timeout_ms: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("FETCH_TIMEOUT_MS"));
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let config = Config {
            profit_threshold: dec!(-0.5),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("PROFIT_THRESHOLD"));
    }

    #[test]
    fn duration_helpers() {
        let config = Config::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.fetch_timeout(), Duration::from_millis(10_000));
    }
}
