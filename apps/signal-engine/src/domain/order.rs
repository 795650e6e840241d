//! Broker order snapshot and its enumerations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy side.
    Buy,
    /// Sell side.
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute at the current market price.
    Market,
    /// Execute at the limit price or better.
    Limit,
    /// Market order triggered at the stop price.
    Stop,
    /// Limit order triggered at the stop price.
    StopLimit,
    /// Stop whose trigger trails the market by a percentage.
    TrailingStop,
}

/// Time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the trading day.
    Day,
    /// Good till canceled.
    Gtc,
}

/// Order status as reported by the broker.
///
/// The fill waiter treats `{Filled, Canceled, Expired, DoneForDay}` as
/// terminal; everything else keeps the poll loop alive until its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted but not yet routed.
    New,
    /// Acknowledged by the venue.
    Accepted,
    /// Submission in flight.
    PendingNew,
    /// Some quantity filled.
    PartiallyFilled,
    /// Completely filled.
    Filled,
    /// Canceled.
    Canceled,
    /// Expired (e.g. a day order at the close).
    Expired,
    /// Held until the next trading day.
    DoneForDay,
    /// Rejected by the broker.
    Rejected,
}

impl OrderStatus {
    /// True when the status ends fill polling.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Canceled | Self::Expired | Self::DoneForDay
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Accepted => "accepted",
            Self::PendingNew => "pending_new",
            Self::PartiallyFilled => "partially_filled",
            Self::Filled => "filled",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::DoneForDay => "done_for_day",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Read-only snapshot of an order as the broker last reported it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerOrder {
    /// Broker-assigned order id.
    pub id: String,
    /// Instrument symbol.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Requested quantity, when the order was share-sized.
    pub qty: Option<Decimal>,
    /// Quantity filled so far.
    pub filled_qty: Decimal,
    /// Average fill price, once anything has filled.
    pub filled_avg_price: Option<Decimal>,
    /// Last reported status.
    pub status: OrderStatus,
}

impl BrokerOrder {
    /// Mark the snapshot canceled locally after a cancel request.
    #[must_use]
    pub fn into_canceled(mut self) -> Self {
        self.status = OrderStatus::Canceled;
        self
    }
}
