//! Alpaca API request and response types.
//!
//! These types map directly to Alpaca's REST API format. Numeric fields
//! travel as strings on the wire.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::OrderRequest;
use crate::domain::{
    AccountSnapshot, BrokerOrder, MarketClock, OrderSide, OrderStatus, OrderType, Position,
    PositionSide, Quote, TimeInForce,
};

use super::error::AlpacaError;

/// Take-profit leg of a bracket order.
#[derive(Debug, Clone, Serialize)]
pub struct TakeProfitLeg {
    /// Limit price for the take-profit leg.
    pub limit_price: String,
}

/// Stop-loss leg of a bracket order.
#[derive(Debug, Clone, Serialize)]
pub struct StopLossLeg {
    /// Trigger price for the stop-loss leg.
    pub stop_price: String,
}

/// Order request for Alpaca API.
#[derive(Debug, Clone, Serialize)]
pub struct AlpacaOrderRequest {
    /// Stock symbol.
    pub symbol: String,
    /// Quantity (shares).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<String>,
    /// Notional value (dollars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<String>,
    /// Order side.
    pub side: String,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Time in force.
    pub time_in_force: String,
    /// Limit price (for limit and stop-limit orders).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<String>,
    /// Stop price (for stop and stop-limit orders).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    /// Trail percent (for trailing-stop orders).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_percent: Option<String>,
    /// Client order ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Extended hours trading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_hours: Option<bool>,
    /// Order class; "bracket" when exit legs are attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_class: Option<String>,
    /// Take-profit leg (bracket orders).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<TakeProfitLeg>,
    /// Stop-loss leg (bracket orders).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<StopLossLeg>,
}

impl From<&OrderRequest> for AlpacaOrderRequest {
    fn from(request: &OrderRequest) -> Self {
        let side = match request.side {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        };

        let order_type = match request.order_type {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Stop => "stop",
            OrderType::StopLimit => "stop_limit",
            OrderType::TrailingStop => "trailing_stop",
        };

        let time_in_force = match request.time_in_force {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
        };

        Self {
            symbol: request.symbol.clone(),
            qty: request.qty.map(|q| q.to_string()),
            notional: request.notional.map(|n| n.to_string()),
            side: side.to_string(),
            order_type: order_type.to_string(),
            time_in_force: time_in_force.to_string(),
            limit_price: request.limit_price.map(|p| p.to_string()),
            stop_price: request.stop_price.map(|p| p.to_string()),
            trail_percent: request.trail_percent.map(|p| p.to_string()),
            client_order_id: Some(request.client_order_id.clone()),
            extended_hours: if request.extended_hours {
                Some(true)
            } else {
                None
            },
            order_class: request.bracket.map(|_| "bracket".to_string()),
            take_profit: request.bracket.map(|legs| TakeProfitLeg {
                limit_price: legs.take_profit_limit.to_string(),
            }),
            stop_loss: request.bracket.map(|legs| StopLossLeg {
                stop_price: legs.stop_loss_stop.to_string(),
            }),
        }
    }
}

/// Order response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOrderResponse {
    /// Broker order ID.
    pub id: String,
    /// Symbol.
    pub symbol: String,
    /// Order side.
    pub side: String,
    /// Quantity (as string); absent for notional orders.
    #[serde(default)]
    pub qty: Option<String>,
    /// Filled quantity (as string).
    pub filled_qty: String,
    /// Average fill price (as string).
    #[serde(default)]
    pub filled_avg_price: Option<String>,
    /// Order status.
    pub status: String,
}

impl AlpacaOrderResponse {
    /// Convert to the domain order snapshot.
    #[must_use]
    pub fn to_broker_order(&self) -> BrokerOrder {
        BrokerOrder {
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            side: if self.side == "sell" {
                OrderSide::Sell
            } else {
                OrderSide::Buy
            },
            qty: self.qty.as_ref().and_then(|q| q.parse().ok()),
            filled_qty: self.filled_qty.parse().unwrap_or(Decimal::ZERO),
            filled_avg_price: self.filled_avg_price.as_ref().and_then(|p| p.parse().ok()),
            status: parse_order_status(&self.status),
        }
    }
}

/// Account response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaAccountResponse {
    /// Account equity.
    pub equity: String,
    /// Buying power.
    pub buying_power: String,
    /// Non-marginable buying power.
    pub non_marginable_buying_power: String,
    /// Day trade count.
    #[serde(default)]
    pub daytrade_count: Option<u32>,
}

impl AlpacaAccountResponse {
    /// Convert to the domain account snapshot.
    ///
    /// # Errors
    ///
    /// `JsonParse` when a numeric field is not a valid decimal.
    pub fn to_snapshot(&self) -> Result<AccountSnapshot, AlpacaError> {
        let parse = |field: &str, value: &str| {
            value.parse::<Decimal>().map_err(|_| {
                AlpacaError::JsonParse(format!("account field {field} is not a decimal: {value}"))
            })
        };
        Ok(AccountSnapshot {
            buying_power: parse("buying_power", &self.buying_power)?,
            non_marginable_buying_power: parse(
                "non_marginable_buying_power",
                &self.non_marginable_buying_power,
            )?,
            equity: parse("equity", &self.equity)?,
            daytrade_count: self.daytrade_count.unwrap_or(0),
        })
    }
}

/// Position response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaPositionResponse {
    /// Symbol.
    pub symbol: String,
    /// Quantity (signed; negative for shorts).
    pub qty: String,
    /// Side (long/short).
    pub side: String,
}

impl AlpacaPositionResponse {
    /// Convert to the domain position snapshot.
    ///
    /// # Errors
    ///
    /// `JsonParse` when the quantity is not a valid decimal.
    pub fn to_position(&self) -> Result<Position, AlpacaError> {
        let qty: Decimal = self.qty.parse().map_err(|_| {
            AlpacaError::JsonParse(format!("position qty is not a decimal: {}", self.qty))
        })?;
        Ok(Position {
            symbol: self.symbol.clone(),
            side: if self.side == "short" {
                PositionSide::Short
            } else {
                PositionSide::Long
            },
            qty: qty.abs(),
        })
    }
}

/// Market clock response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaClockResponse {
    /// Whether the regular session is open.
    pub is_open: bool,
    /// Current timestamp with the exchange's local offset.
    pub timestamp: String,
}

impl AlpacaClockResponse {
    /// Convert to the domain market clock.
    ///
    /// # Errors
    ///
    /// `JsonParse` when the timestamp is not RFC 3339.
    pub fn to_clock(&self) -> Result<MarketClock, AlpacaError> {
        let timestamp = DateTime::<FixedOffset>::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| AlpacaError::JsonParse(format!("clock timestamp: {e}")))?;
        Ok(MarketClock {
            is_open: self.is_open,
            timestamp,
        })
    }
}

/// Top-of-book quote payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AlpacaQuote {
    /// Ask price.
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
    /// Bid price.
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
}

impl AlpacaQuote {
    /// Convert to the domain quote.
    #[must_use]
    pub const fn to_quote(self) -> Quote {
        Quote {
            bid_price: self.bid_price,
            ask_price: self.ask_price,
        }
    }
}

/// Envelope for `GET /v2/stocks/{symbol}/quotes/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockQuoteEnvelope {
    /// The quote.
    pub quote: AlpacaQuote,
}

/// Envelope for `GET /v1beta3/crypto/us/latest/quotes`.
#[derive(Debug, Clone, Deserialize)]
pub struct CryptoQuotesEnvelope {
    /// Quotes keyed by pair symbol.
    pub quotes: HashMap<String, AlpacaQuote>,
}

/// Error response from Alpaca API.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaErrorResponse {
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Error message.
    pub message: String,
}

/// Parse Alpaca order status string to domain `OrderStatus`.
fn parse_order_status(status: &str) -> OrderStatus {
    match status.to_lowercase().as_str() {
        "accepted" | "accepted_for_bidding" | "replaced" | "pending_replace" => {
            OrderStatus::Accepted
        }
        "pending_new" => OrderStatus::PendingNew,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "filled" => OrderStatus::Filled,
        "done_for_day" => OrderStatus::DoneForDay,
        "expired" => OrderStatus::Expired,
        "canceled" | "pending_cancel" => OrderStatus::Canceled,
        "rejected" => OrderStatus::Rejected,
        // new, stopped, suspended, calculated, and unknown -> New
        _ => OrderStatus::New,
    }
}
