//! Registry of per-account executors.
//!
//! Each configured account gets its own broker adapter and executor, so a
//! signal addressed to one account never contends with another account's
//! in-flight executions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{AccountCredentials, ExecutionSettings};
use crate::execution::TradeExecutor;

use super::broker::alpaca::{AlpacaBrokerAdapter, AlpacaConfig, AlpacaEnvironment, AlpacaError};

/// Executor type bound to the Alpaca adapter for both ports.
pub type AlpacaExecutor = TradeExecutor<AlpacaBrokerAdapter, AlpacaBrokerAdapter>;

/// Named executors, one per configured account.
pub struct AccountRegistry {
    executors: HashMap<String, Arc<AlpacaExecutor>>,
}

impl AccountRegistry {
    /// Build executors for every configured account.
    ///
    /// # Errors
    ///
    /// Adapter construction failures (empty credentials).
    pub fn new(
        accounts: &[AccountCredentials],
        settings: &ExecutionSettings,
    ) -> Result<Self, AlpacaError> {
        let mut executors = HashMap::with_capacity(accounts.len());
        for account in accounts {
            let environment = if account.paper {
                AlpacaEnvironment::Paper
            } else {
                AlpacaEnvironment::Live
            };
            let config = AlpacaConfig::new(
                account.api_key.clone(),
                account.api_secret.clone(),
                environment,
            );
            let adapter = Arc::new(AlpacaBrokerAdapter::new(config)?);
            let executor = TradeExecutor::new(
                Arc::clone(&adapter),
                adapter,
                settings.clone(),
            );
            tracing::info!(
                account = %account.name,
                environment = %environment,
                "Registered trading account"
            );
            executors.insert(account.name.clone(), Arc::new(executor));
        }
        Ok(Self { executors })
    }

    /// Look up the executor for a named account.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<AlpacaExecutor>> {
        self.executors.get(name)
    }

    /// Names of all registered accounts.
    #[must_use]
    pub fn account_names(&self) -> Vec<&str> {
        self.executors.keys().map(String::as_str).collect()
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.executors.len()
    }

    /// True when no accounts are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}
