//! Position reconciliation: compare desired vs. held position.

use crate::domain::{MarketPosition, Position, PositionSide};

/// What to do about an existing holding before opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// No holding exists; open directly.
    OpenFresh,
    /// Desired position is already held (or flat was requested); submit
    /// nothing and echo the signal back.
    NoOp {
        /// Side currently held.
        held: PositionSide,
    },
    /// Holding is on the opposite side; close it first, wait for the fill,
    /// then open the new side.
    CloseThenOpen {
        /// Side currently held.
        held: PositionSide,
    },
}

/// Decide how to reconcile the desired position with the holding.
///
/// Idempotent by construction: a signal matching the held side (or asking
/// for flat while holding) produces no orders. When sides differ the close
/// happens regardless of what the incoming order's own `market_position`
/// claims about the new side.
#[must_use]
pub fn decide(existing: Option<&Position>, desired: MarketPosition) -> ReconcileAction {
    match existing {
        None => ReconcileAction::OpenFresh,
        Some(position) => {
            if position.side.as_market_position() == desired || desired == MarketPosition::Flat {
                ReconcileAction::NoOp {
                    held: position.side,
                }
            } else {
                ReconcileAction::CloseThenOpen {
                    held: position.side,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn held(side: PositionSide) -> Position {
        Position {
            symbol: "AAPL".to_string(),
            side,
            qty: dec!(10),
        }
    }

    #[test]
    fn no_position_opens_fresh() {
        assert_eq!(
            decide(None, MarketPosition::Long),
            ReconcileAction::OpenFresh
        );
        assert_eq!(
            decide(None, MarketPosition::Short),
            ReconcileAction::OpenFresh
        );
    }

    #[test]
    fn same_side_is_noop() {
        assert_eq!(
            decide(Some(&held(PositionSide::Long)), MarketPosition::Long),
            ReconcileAction::NoOp {
                held: PositionSide::Long
            }
        );
        assert_eq!(
            decide(Some(&held(PositionSide::Short)), MarketPosition::Short),
            ReconcileAction::NoOp {
                held: PositionSide::Short
            }
        );
    }

    #[test]
    fn desired_flat_is_noop() {
        assert_eq!(
            decide(Some(&held(PositionSide::Long)), MarketPosition::Flat),
            ReconcileAction::NoOp {
                held: PositionSide::Long
            }
        );
    }

    #[test]
    fn opposite_side_closes_then_opens() {
        assert_eq!(
            decide(Some(&held(PositionSide::Long)), MarketPosition::Short),
            ReconcileAction::CloseThenOpen {
                held: PositionSide::Long
            }
        );
        assert_eq!(
            decide(Some(&held(PositionSide::Short)), MarketPosition::Long),
            ReconcileAction::CloseThenOpen {
                held: PositionSide::Short
            }
        );
    }
}
