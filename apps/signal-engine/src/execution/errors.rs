//! Execution error taxonomy.
//!
//! Validation and risk rejections happen before any broker mutation, so
//! callers may retry them safely. `PartialExecution` is raised only after
//! local recovery (liquidation) has already run.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::ports::BrokerError;
use crate::domain::BrokerOrder;

/// Signal rejected before any broker call.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Computed notional is below the minimum tradable amount.
    #[error("notional {notional} is below the 1.00 minimum")]
    InsufficientNotional {
        /// The computed notional.
        notional: Decimal,
    },

    /// A share-sized order path requires at least one whole share.
    #[error("share-sized orders require an integer quantity of at least 1, computed {qty}")]
    InvalidQuantity {
        /// The computed share quantity.
        qty: Decimal,
    },

    /// The signal itself is malformed.
    #[error("invalid signal: {reason}")]
    InvalidSignal {
        /// Why the signal was rejected.
        reason: String,
    },
}

/// Trade refused by a risk check, before any submission.
#[derive(Debug, Clone, Error)]
pub enum RiskViolation {
    /// Day-trade limit reached on an account under the equity threshold.
    #[error(
        "pattern day trader limit: {day_trade_count} day trades used with equity {equity} \
         below {threshold}"
    )]
    PatternDayTraderBlocked {
        /// Day trades used in the rolling window.
        day_trade_count: u32,
        /// Current account equity.
        equity: Decimal,
        /// Equity threshold under which the limit applies.
        threshold: Decimal,
    },

    /// Quoted price drifted too far from the signal's reference price.
    #[error("slippage {observed} exceeds maximum {limit}")]
    SlippageExceeded {
        /// Observed relative deviation.
        observed: Decimal,
        /// Configured maximum.
        limit: Decimal,
    },
}

/// Error returned by the execution pipeline.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Rejected by signal validation or sizing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Refused by a risk gate.
    #[error(transparent)]
    Risk(#[from] RiskViolation),

    /// A broker call failed outside the fill-wait path.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Exit-order construction failed after the entry filled.
    ///
    /// Recovery (liquidation) has already run; the account is flat or
    /// protected. The embedded entry order is the last known state.
    #[error("exit order construction failed after entry fill: {source}")]
    PartialExecution {
        /// Last known state of the entry order.
        entry: BrokerOrder,
        /// Liquidation order submitted during recovery, if any.
        liquidation: Option<BrokerOrder>,
        /// The failure that triggered recovery.
        source: Box<ExecutionError>,
    },
}

impl ExecutionError {
    /// True when the failure occurred before any broker state changed.
    #[must_use]
    pub const fn is_pre_submission(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Risk(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validation_and_risk_are_pre_submission() {
        let validation: ExecutionError = ValidationError::InsufficientNotional {
            notional: dec!(0.50),
        }
        .into();
        assert!(validation.is_pre_submission());

        let risk: ExecutionError = RiskViolation::SlippageExceeded {
            observed: dec!(0.02),
            limit: dec!(0.01),
        }
        .into();
        assert!(risk.is_pre_submission());
    }

    #[test]
    fn broker_errors_are_not_pre_submission() {
        let err: ExecutionError = BrokerError::RateLimited.into();
        assert!(!err.is_pre_submission());
    }
}
