//! Signal sizing against account buying power.

use rust_decimal::Decimal;

use super::errors::ValidationError;
use crate::domain::{AccountSnapshot, TradeSignal};

/// Sizing derived from a signal and the account snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SignalSizing {
    /// Currency amount to deploy, rounded to 2 decimal places.
    pub notional: Decimal,
    /// Whole-share quantity at the signal's reference price.
    pub qty: Decimal,
}

/// Size a signal against the account.
///
/// Leveraged and crypto signals draw from non-marginable buying power;
/// everything else uses standard buying power.
///
/// # Errors
///
/// `InsufficientNotional` when the computed notional is under 1.00.
/// `InvalidQuantity` when the signal carries an exit instruction (which
/// forces share-sized orders) and the whole-share quantity is zero.
pub fn size_signal(
    signal: &TradeSignal,
    account: &AccountSnapshot,
) -> Result<SignalSizing, ValidationError> {
    let buying_power = if signal.leveraged || signal.asset_class.is_crypto() {
        account.non_marginable_buying_power
    } else {
        account.buying_power
    };

    let notional = (buying_power * signal.buying_power_pct).round_dp(2);
    if notional < Decimal::ONE {
        return Err(ValidationError::InsufficientNotional { notional });
    }

    let qty = (notional / signal.price).floor();
    if signal.has_exit_instruction() && qty < Decimal::ONE {
        return Err(ValidationError::InvalidQuantity { qty });
    }

    Ok(SignalSizing { notional, qty })
}
