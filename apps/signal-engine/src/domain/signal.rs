//! Inbound trade signal and its enumerations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the signal: whether the sender wants to buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Buy (open or add to a long).
    Buy,
    /// Sell (open a short or reduce a long).
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// The position the sender wants to end up in after this signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPosition {
    /// Net long.
    Long,
    /// Net short.
    Short,
    /// No position.
    Flat,
}

impl fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Asset class of the instrument being traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// US equity.
    Stock,
    /// Crypto pair.
    Crypto,
}

impl AssetClass {
    /// True for crypto instruments.
    #[must_use]
    pub const fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto)
    }
}

/// A validated inbound trade signal.
///
/// Percentages (`buying_power_pct`, `stop_loss_pct`, `take_profit_pct`,
/// `trailing_stop_pct`, `max_slippage_pct`) are fractions in `0..=1`,
/// not whole-number percents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    /// Instrument ticker.
    pub ticker: String,
    /// Buy or sell.
    pub action: Action,
    /// Desired resulting position.
    pub market_position: MarketPosition,
    /// Reference price from the signal source.
    pub price: Decimal,
    /// Fraction of buying power to deploy.
    pub buying_power_pct: Decimal,
    /// Use non-marginable buying power when sizing.
    #[serde(default)]
    pub leveraged: bool,
    /// Asset class of the instrument.
    pub asset_class: AssetClass,
    /// Stop-loss distance as a fraction of entry price.
    #[serde(default)]
    pub stop_loss_pct: Option<Decimal>,
    /// Take-profit distance as a fraction of entry price.
    #[serde(default)]
    pub take_profit_pct: Option<Decimal>,
    /// Trailing-stop distance as a fraction of entry price.
    #[serde(default)]
    pub trailing_stop_pct: Option<Decimal>,
    /// Maximum tolerated deviation from the reference price.
    #[serde(default)]
    pub max_slippage_pct: Option<Decimal>,
    /// Intraday high, used as the extended-hours limit price.
    #[serde(default)]
    pub high: Option<Decimal>,
    /// Free-form label from the signal source.
    #[serde(default)]
    pub nickname: Option<String>,
}

impl TradeSignal {
    /// True when any exit instruction is present on the signal.
    ///
    /// Signals with exit instructions must be sized in whole shares.
    #[must_use]
    pub const fn has_exit_instruction(&self) -> bool {
        self.stop_loss_pct.is_some()
            || self.take_profit_pct.is_some()
            || self.trailing_stop_pct.is_some()
    }

    /// Validate structural invariants before any broker call.
    ///
    /// # Errors
    ///
    /// Returns the reason the signal is malformed: non-positive price,
    /// a buying power fraction outside `(0, 1]`, or a trailing stop
    /// combined with a stop-loss/take-profit (the exit shapes are
    /// mutually exclusive).
    pub fn validate(&self) -> Result<(), String> {
        if self.ticker.is_empty() {
            return Err("ticker cannot be empty".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err(format!("price must be positive, got {}", self.price));
        }
        if self.buying_power_pct <= Decimal::ZERO || self.buying_power_pct > Decimal::ONE {
            return Err(format!(
                "buying_power_pct must be in (0, 1], got {}",
                self.buying_power_pct
            ));
        }
        if self.trailing_stop_pct.is_some()
            && (self.stop_loss_pct.is_some() || self.take_profit_pct.is_some())
        {
            return Err(
                "trailing_stop_pct cannot be combined with stop_loss_pct or take_profit_pct"
                    .to_string(),
            );
        }
        Ok(())
    }
}
