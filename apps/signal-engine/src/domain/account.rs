//! Account and market-clock snapshots.

use chrono::{DateTime, FixedOffset, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-request snapshot of account state used for sizing and risk checks.
///
/// Fetched once per signal and never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Standard buying power.
    pub buying_power: Decimal,
    /// Non-marginable buying power, used for leveraged and crypto sizing.
    pub non_marginable_buying_power: Decimal,
    /// Account equity.
    pub equity: Decimal,
    /// Day trades used in the rolling regulatory window.
    pub daytrade_count: u32,
}

/// Broker market clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketClock {
    /// Whether the regular session is open.
    pub is_open: bool,
    /// Current time in the exchange's local offset.
    pub timestamp: DateTime<FixedOffset>,
}

/// First hour (inclusive) of the extended-hours band.
const EXTENDED_HOURS_START: u32 = 4;

/// End hour (exclusive) of the extended-hours band.
const EXTENDED_HOURS_END: u32 = 20;

impl MarketClock {
    /// True when the regular session is closed but the pre/post-market
    /// band (04:00..20:00 local) is active.
    #[must_use]
    pub fn is_extended_hours(&self) -> bool {
        if self.is_open {
            return false;
        }
        let hour = self.timestamp.hour();
        (EXTENDED_HOURS_START..EXTENDED_HOURS_END).contains(&hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(hour: u32, is_open: bool) -> MarketClock {
        let timestamp = format!("2026-08-21T{hour:02}:30:00-04:00")
            .parse::<DateTime<FixedOffset>>()
            .unwrap();
        MarketClock { is_open, timestamp }
    }

    #[test]
    fn open_market_is_never_extended_hours() {
        assert!(!clock_at(10, true).is_extended_hours());
    }

    #[test]
    fn premarket_hours_are_extended() {
        assert!(clock_at(4, false).is_extended_hours());
        assert!(clock_at(7, false).is_extended_hours());
    }

    #[test]
    fn postmarket_hours_are_extended() {
        assert!(clock_at(17, false).is_extended_hours());
        assert!(clock_at(19, false).is_extended_hours());
    }

    #[test]
    fn overnight_hours_are_not_extended() {
        assert!(!clock_at(20, false).is_extended_hours());
        assert!(!clock_at(23, false).is_extended_hours());
        assert!(!clock_at(3, false).is_extended_hours());
    }
}
