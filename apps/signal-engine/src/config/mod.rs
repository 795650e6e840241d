//! Engine configuration.
//!
//! Loaded from YAML; broker credentials may be given literally or as
//! `${ENV_VAR}` references resolved at load time so secrets stay out of
//! config files.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the YAML.
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Missing required environment variable.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Validation failed.
    #[error("config validation failed: {0}")]
    ValidationError(String),
}

/// Pattern-day-trade guard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdtSettings {
    /// Day trades allowed in the rolling window before the guard engages.
    pub max_day_trades: u32,
    /// Equity threshold under which the guard applies (strictly below).
    pub equity_threshold: Decimal,
}

impl Default for PdtSettings {
    fn default() -> Self {
        Self {
            max_day_trades: 3,
            equity_threshold: Decimal::new(25_000, 0),
        }
    }
}

/// Execution pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Milliseconds between order-status refreshes while waiting for fills.
    pub poll_interval_ms: u64,
    /// Hard wall-clock deadline for a fill wait, in seconds.
    pub fill_deadline_secs: u64,
    /// Pattern-day-trade guard.
    pub pdt: PdtSettings,
}

impl ExecutionSettings {
    /// Poll interval as a duration.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Fill deadline as a duration.
    #[must_use]
    pub const fn fill_deadline(&self) -> Duration {
        Duration::from_secs(self.fill_deadline_secs)
    }
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            fill_deadline_secs: 30,
            pdt: PdtSettings::default(),
        }
    }
}

/// Credentials for one named broker account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCredentials {
    /// Name the account is addressed by.
    pub name: String,
    /// API key, literal or `${ENV_VAR}`.
    pub api_key: String,
    /// API secret, literal or `${ENV_VAR}`.
    pub api_secret: String,
    /// Paper account (simulated) rather than live.
    #[serde(default = "default_paper")]
    pub paper: bool,
}

const fn default_paper() -> bool {
    true
}

/// Root engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Execution pipeline settings.
    #[serde(default)]
    pub execution: ExecutionSettings,
    /// Configured broker accounts.
    #[serde(default)]
    pub accounts: Vec<AccountCredentials>,
}

impl EngineConfig {
    /// Parse configuration from a YAML string, resolving `${ENV_VAR}`
    /// credential references.
    ///
    /// # Errors
    ///
    /// Parse failures, unresolvable environment references, or duplicate
    /// account names.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml_bw::from_str(yaml)?;
        for account in &mut config.accounts {
            account.api_key = resolve_env(&account.api_key)?;
            account.api_secret = resolve_env(&account.api_secret)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// IO, parse, or validation failures.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.execution.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.execution.fill_deadline_secs == 0 {
            return Err(ConfigError::ValidationError(
                "fill_deadline_secs must be positive".to_string(),
            ));
        }
        let mut names: Vec<&str> = self.accounts.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.accounts.len() {
            return Err(ConfigError::ValidationError(
                "duplicate account names".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve `${ENV_VAR}` references; literal values pass through.
fn resolve_env(value: &str) -> Result<String, ConfigError> {
    if let Some(name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
        return std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()));
    }
    Ok(value.to_string())
}
