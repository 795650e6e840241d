//! Open position snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::MarketPosition;

/// Side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    /// Net long.
    Long,
    /// Net short.
    Short,
}

impl PositionSide {
    /// The market position this side corresponds to.
    #[must_use]
    pub const fn as_market_position(&self) -> MarketPosition {
        match self {
            Self::Long => MarketPosition::Long,
            Self::Short => MarketPosition::Short,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// Read-only snapshot of a held position, fetched per request and never
/// cached across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Instrument symbol.
    pub symbol: String,
    /// Side of the holding.
    pub side: PositionSide,
    /// Held quantity.
    pub qty: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_maps_to_market_position() {
        assert_eq!(
            PositionSide::Long.as_market_position(),
            MarketPosition::Long
        );
        assert_eq!(
            PositionSide::Short.as_market_position(),
            MarketPosition::Short
        );
    }
}
