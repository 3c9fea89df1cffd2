//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Input validation lives here, at the configuration boundary — the
//! engine assumes a validated `SessionConfig`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;
/// Maximum tick interval in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 2000;
/// Minimum initial bankroll in currency units.
pub const MIN_INITIAL_BANKROLL: i64 = 100;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub server: ServerConfig,
}

/// Per-session engine configuration. Immutable for the lifetime of a
/// session; replaced wholesale (with a reset) by `Session::apply_config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub initial_bankroll: i64,
    pub initial_bet: i64,
    pub tick_interval_ms: u64,
    pub strategy_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_bankroll: 1000,
            initial_bet: 10,
            tick_interval_ms: 1000,
            strategy_enabled: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub enabled: bool,
    pub port: u16,
}

/// Validation errors for session configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial bankroll must be at least {MIN_INITIAL_BANKROLL}, got {0}")]
    BankrollTooLow(i64),

    #[error("initial bet must be at least 1, got {0}")]
    BetTooSmall(i64),

    #[error(
        "tick interval must be between {MIN_TICK_INTERVAL_MS} and {MAX_TICK_INTERVAL_MS} ms, got {0}"
    )]
    IntervalOutOfRange(u64),
}

impl SessionConfig {
    /// Check the configured bounds: bankroll ≥ 100, bet ≥ 1,
    /// interval in [100, 2000] ms.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_bankroll < MIN_INITIAL_BANKROLL {
            return Err(ConfigError::BankrollTooLow(self.initial_bankroll));
        }
        if self.initial_bet < 1 {
            return Err(ConfigError::BetTooSmall(self.initial_bet));
        }
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(ConfigError::IntervalOutOfRange(self.tick_interval_ms));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and validate the session section.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config
            .session
            .validate()
            .with_context(|| format!("Invalid session config in {path}"))?;
        Ok(config)
    }
}
