//! Broker Port (Driven Port)
//!
//! Interface for the brokerage the execution core submits orders to.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountSnapshot, BrokerOrder, MarketClock, OrderSide, OrderType, Position, TimeInForce,
};

/// Attached exit leg of a bracket order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExitLeg {
    /// Take-profit limit price.
    pub take_profit_limit: Decimal,
    /// Stop-loss trigger price.
    pub stop_loss_stop: Decimal,
}

/// Request to submit an order to the broker.
///
/// Exactly one of `qty` and `notional` is set; `ExitLeg` turns the request
/// into an atomic bracket submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Client order id.
    pub client_order_id: String,
    /// Symbol to trade.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Order type.
    pub order_type: OrderType,
    /// Share quantity, for share-sized orders.
    pub qty: Option<Decimal>,
    /// Currency amount, for notional orders.
    pub notional: Option<Decimal>,
    /// Limit price (limit and stop-limit orders).
    pub limit_price: Option<Decimal>,
    /// Stop trigger price (stop and stop-limit orders).
    pub stop_price: Option<Decimal>,
    /// Trail distance as a whole-number percent (trailing-stop orders).
    pub trail_percent: Option<Decimal>,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Eligible for the pre/post-market session.
    pub extended_hours: bool,
    /// Attached take-profit and stop-loss legs (bracket orders).
    pub bracket: Option<ExitLeg>,
}

impl OrderRequest {
    fn base(symbol: impl Into<String>, side: OrderSide, order_type: OrderType) -> Self {
        Self {
            client_order_id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            order_type,
            qty: None,
            notional: None,
            limit_price: None,
            stop_price: None,
            trail_percent: None,
            time_in_force: TimeInForce::Day,
            extended_hours: false,
            bracket: None,
        }
    }

    /// Market order sized by currency amount.
    #[must_use]
    pub fn market_notional(symbol: impl Into<String>, side: OrderSide, notional: Decimal) -> Self {
        let mut request = Self::base(symbol, side, OrderType::Market);
        request.notional = Some(notional);
        request
    }

    /// Market order sized in shares.
    #[must_use]
    pub fn market_qty(symbol: impl Into<String>, side: OrderSide, qty: Decimal) -> Self {
        let mut request = Self::base(symbol, side, OrderType::Market);
        request.qty = Some(qty);
        request
    }

    /// Share-sized limit order.
    #[must_use]
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        qty: Decimal,
        limit_price: Decimal,
    ) -> Self {
        let mut request = Self::base(symbol, side, OrderType::Limit);
        request.qty = Some(qty);
        request.limit_price = Some(limit_price);
        request
    }

    /// Stop order triggered at `stop_price`.
    #[must_use]
    pub fn stop(
        symbol: impl Into<String>,
        side: OrderSide,
        qty: Decimal,
        stop_price: Decimal,
    ) -> Self {
        let mut request = Self::base(symbol, side, OrderType::Stop);
        request.qty = Some(qty);
        request.stop_price = Some(stop_price);
        request
    }

    /// Stop-limit order.
    #[must_use]
    pub fn stop_limit(
        symbol: impl Into<String>,
        side: OrderSide,
        qty: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Self {
        let mut request = Self::base(symbol, side, OrderType::StopLimit);
        request.qty = Some(qty);
        request.stop_price = Some(stop_price);
        request.limit_price = Some(limit_price);
        request
    }

    /// Trailing-stop order with the trail as a whole-number percent.
    #[must_use]
    pub fn trailing_stop(
        symbol: impl Into<String>,
        side: OrderSide,
        qty: Decimal,
        trail_percent: Decimal,
    ) -> Self {
        let mut request = Self::base(symbol, side, OrderType::TrailingStop);
        request.qty = Some(qty);
        request.trail_percent = Some(trail_percent);
        request
    }

    /// Set time in force.
    #[must_use]
    pub const fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Enable extended-hours eligibility.
    #[must_use]
    pub const fn with_extended_hours(mut self) -> Self {
        self.extended_hours = true;
        self
    }

    /// Attach take-profit and stop-loss legs, making this a bracket order.
    #[must_use]
    pub const fn with_bracket(mut self, take_profit_limit: Decimal, stop_loss_stop: Decimal) -> Self {
        self.bracket = Some(ExitLeg {
            take_profit_limit,
            stop_loss_stop,
        });
        self
    }

    /// True when the request carries attached bracket legs.
    #[must_use]
    pub const fn is_bracket(&self) -> bool {
        self.bracket.is_some()
    }
}

/// Broker port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BrokerError {
    /// Connection error.
    #[error("broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Order rejected by broker.
    #[error("order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Requested resource does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// The missing order or position.
        resource: String,
    },

    /// Rate limited.
    #[error("rate limited by broker")]
    RateLimited,

    /// Unknown error.
    #[error("broker error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for broker interactions.
///
/// Position reads are per-request snapshots of broker-owned state; the core
/// never caches them across requests.
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Fetch the account snapshot used for sizing and risk checks.
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError>;

    /// Fetch the market clock.
    async fn get_clock(&self) -> Result<MarketClock, BrokerError>;

    /// Fetch the open position for a symbol.
    ///
    /// `Ok(None)` means no position is held; transport and API failures
    /// surface as `Err`.
    async fn get_open_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError>;

    /// Submit an order.
    async fn submit_order(&self, request: OrderRequest) -> Result<BrokerOrder, BrokerError>;

    /// Refresh an order snapshot by broker id.
    async fn get_order(&self, order_id: &str) -> Result<BrokerOrder, BrokerError>;

    /// Cancel an order by broker id.
    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError>;

    /// Liquidate a percentage of an open position.
    ///
    /// `Ok(None)` means the broker had nothing to close.
    async fn close_position(
        &self,
        symbol: &str,
        percentage: Decimal,
    ) -> Result<Option<BrokerOrder>, BrokerError>;
}
