//! Quote Provider Port
//!
//! Interface for latest-quote lookups used by the slippage guard. Injected
//! explicitly so the caller decides which account or feed serves quotes.

use async_trait::async_trait;

use super::broker_port::BrokerError;
use crate::domain::{AssetClass, Quote};

/// Port for fetching the latest top-of-book quote.
#[async_trait]
pub trait QuoteProviderPort: Send + Sync {
    /// Fetch the latest quote for a symbol.
    ///
    /// # Errors
    ///
    /// Returns error if the market-data call fails.
    async fn latest_quote(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<Quote, BrokerError>;
}
