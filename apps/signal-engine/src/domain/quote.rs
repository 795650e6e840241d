//! Latest market quote.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-of-book quote used by the slippage guard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid.
    pub bid_price: Decimal,
    /// Best ask.
    pub ask_price: Decimal,
}
