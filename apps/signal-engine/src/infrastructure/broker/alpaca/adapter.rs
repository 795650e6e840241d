//! Alpaca broker adapter implementing the broker and quote ports.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::application::ports::{
    BrokerError, BrokerPort, OrderRequest, QuoteProviderPort,
};
use crate::domain::{
    AccountSnapshot, AssetClass, BrokerOrder, MarketClock, Position, Quote,
};

use super::api_types::{
    AlpacaAccountResponse, AlpacaClockResponse, AlpacaOrderRequest, AlpacaOrderResponse,
    AlpacaPositionResponse, CryptoQuotesEnvelope, StockQuoteEnvelope,
};
use super::config::{AlpacaConfig, AlpacaEnvironment};
use super::error::AlpacaError;
use super::http_client::AlpacaHttpClient;

/// Alpaca Markets broker adapter.
///
/// One adapter per account; it serves both order routing and the latest
/// quotes used by the slippage guard.
#[derive(Debug, Clone)]
pub struct AlpacaBrokerAdapter {
    client: AlpacaHttpClient,
    environment: AlpacaEnvironment,
}

impl AlpacaBrokerAdapter {
    /// Create a new Alpaca broker adapter.
    pub fn new(config: AlpacaConfig) -> Result<Self, AlpacaError> {
        let client = AlpacaHttpClient::new(&config)?;
        Ok(Self {
            client,
            environment: config.environment,
        })
    }

    /// Check if we're in live trading mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.environment.is_live()
    }

    /// Crypto pair symbols go on the wire with a slash (`BTC/USD`), which
    /// must be percent-encoded in a query string.
    fn encode_crypto_pair(symbol: &str) -> String {
        let pair = if symbol.contains('/') {
            symbol.to_string()
        } else if let Some(base) = symbol.strip_suffix("USD") {
            format!("{base}/USD")
        } else {
            symbol.to_string()
        };
        pair.replace('/', "%2F")
    }
}

#[async_trait]
impl BrokerPort for AlpacaBrokerAdapter {
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
        let account: AlpacaAccountResponse = self.client.get("/v2/account").await?;
        Ok(account.to_snapshot()?)
    }

    async fn get_clock(&self) -> Result<MarketClock, BrokerError> {
        let clock: AlpacaClockResponse = self.client.get("/v2/clock").await?;
        Ok(clock.to_clock()?)
    }

    async fn get_open_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let result: Result<AlpacaPositionResponse, AlpacaError> =
            self.client.get(&format!("/v2/positions/{symbol}")).await;

        match result {
            Ok(position) => Ok(Some(position.to_position()?)),
            Err(AlpacaError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn submit_order(&self, request: OrderRequest) -> Result<BrokerOrder, BrokerError> {
        if self.is_live() {
            tracing::warn!(
                client_order_id = %request.client_order_id,
                symbol = %request.symbol,
                "Submitting LIVE order - this will execute real trades"
            );
        }

        let alpaca_request = AlpacaOrderRequest::from(&request);

        tracing::info!(
            client_order_id = %request.client_order_id,
            symbol = %request.symbol,
            side = %alpaca_request.side,
            order_type = %alpaca_request.order_type,
            qty = ?alpaca_request.qty,
            notional = ?alpaca_request.notional,
            "Submitting order to Alpaca"
        );

        let response: AlpacaOrderResponse =
            self.client.post("/v2/orders", &alpaca_request).await?;

        tracing::info!(
            client_order_id = %request.client_order_id,
            broker_order_id = %response.id,
            status = %response.status,
            "Order submitted successfully"
        );

        Ok(response.to_broker_order())
    }

    async fn get_order(&self, order_id: &str) -> Result<BrokerOrder, BrokerError> {
        let response: AlpacaOrderResponse =
            self.client.get(&format!("/v2/orders/{order_id}")).await?;
        Ok(response.to_broker_order())
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        tracing::info!(broker_order_id = %order_id, "Canceling order");
        Ok(self.client.delete(&format!("/v2/orders/{order_id}")).await?)
    }

    async fn close_position(
        &self,
        symbol: &str,
        percentage: Decimal,
    ) -> Result<Option<BrokerOrder>, BrokerError> {
        let result: Result<AlpacaOrderResponse, AlpacaError> = self
            .client
            .delete_json(&format!("/v2/positions/{symbol}?percentage={percentage}"))
            .await;

        match result {
            Ok(order) => Ok(Some(order.to_broker_order())),
            Err(AlpacaError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl QuoteProviderPort for AlpacaBrokerAdapter {
    async fn latest_quote(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<Quote, BrokerError> {
        match asset_class {
            AssetClass::Stock => {
                let envelope: StockQuoteEnvelope = self
                    .client
                    .data_get(&format!("/v2/stocks/{symbol}/quotes/latest"))
                    .await?;
                Ok(envelope.quote.to_quote())
            }
            AssetClass::Crypto => {
                let pair = Self::encode_crypto_pair(symbol);
                let envelope: CryptoQuotesEnvelope = self
                    .client
                    .data_get(&format!("/v1beta3/crypto/us/latest/quotes?symbols={pair}"))
                    .await?;
                envelope
                    .quotes
                    .into_values()
                    .next()
                    .map(super::api_types::AlpacaQuote::to_quote)
                    .ok_or_else(|| BrokerError::NotFound {
                        resource: format!("crypto quote for {symbol}"),
                    })
            }
        }
    }
}
