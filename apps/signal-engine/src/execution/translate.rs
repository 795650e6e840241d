//! Entry order translation.
//!
//! Builds the broker request for the entry leg of a signal plus, where the
//! entry cannot carry its exits atomically, a description of the exit order
//! to synthesize after the fill.

use rust_decimal::Decimal;

use super::errors::ValidationError;
use super::sizing::SignalSizing;
use crate::application::ports::OrderRequest;
use crate::domain::{Action, OrderSide, TimeInForce, TradeSignal};

/// Exit order to derive from the entry's average fill price.
///
/// All distances are fractions of price, as they arrive on the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSpec {
    /// Stop order at `fill * (1 - pct)`.
    StopLoss(Decimal),
    /// Stop-limit with a symmetric band: limit `fill * (1 + pct)`,
    /// stop `fill * (1 - pct)`.
    TakeProfit(Decimal),
    /// Trailing stop with the trail expressed as a whole-number percent.
    TrailingStop(Decimal),
}

/// The entry request and the follow-up exit, if one must be synthesized.
#[derive(Debug, Clone)]
pub struct EntryPlan {
    /// Order request for the entry leg.
    pub request: OrderRequest,
    /// Exit to build after the entry fills. `None` for bracket entries
    /// (exits attached atomically), sell-side entries, and signals without
    /// exit instructions.
    pub exit: Option<ExitSpec>,
}

const fn order_side(action: Action) -> OrderSide {
    match action {
        Action::Buy => OrderSide::Buy,
        Action::Sell => OrderSide::Sell,
    }
}

/// Build the entry plan for a sized signal.
///
/// Order shapes, in priority order:
/// - extended hours (non-crypto): share-sized limit at the signal's `high`
///   (falling back to its price), flagged extended-hours eligible;
/// - stop-loss and take-profit together, regular hours: one atomic bracket;
/// - any exit instruction: share-sized market entry;
/// - otherwise: notional market entry.
///
/// # Errors
///
/// `InvalidQuantity` when a share-sized shape is required and the sized
/// quantity is under one share.
pub fn entry_plan(
    signal: &TradeSignal,
    sizing: &SignalSizing,
    extended_hours: bool,
) -> Result<EntryPlan, ValidationError> {
    let side = order_side(signal.action);
    let tif = if signal.asset_class.is_crypto() {
        TimeInForce::Gtc
    } else {
        TimeInForce::Day
    };

    let require_whole_share = || {
        if sizing.qty < Decimal::ONE {
            Err(ValidationError::InvalidQuantity { qty: sizing.qty })
        } else {
            Ok(())
        }
    };

    // Extended hours forces a limit entry for stocks; brokers reject
    // market and bracket orders outside the regular session.
    if extended_hours && !signal.asset_class.is_crypto() {
        require_whole_share()?;
        let limit_price = signal.high.unwrap_or(signal.price);
        let request = OrderRequest::limit(&signal.ticker, side, sizing.qty, limit_price)
            .with_time_in_force(TimeInForce::Day)
            .with_extended_hours();
        return Ok(EntryPlan {
            request,
            exit: derive_exit(signal, side),
        });
    }

    // Brackets are a regular-session shape. Crypto reaches this point with
    // extended_hours set whenever the stock clock is outside its session;
    // those signals fall through to a share entry with a synthesized exit.
    if let (Some(sl), Some(tp), false) =
        (signal.stop_loss_pct, signal.take_profit_pct, extended_hours)
    {
        require_whole_share()?;
        let stop_price = (signal.price * (Decimal::ONE - sl)).round_dp(2);
        let limit_price = (signal.price * (Decimal::ONE + tp)).round_dp(2);
        let request = OrderRequest::market_qty(&signal.ticker, side, sizing.qty)
            .with_time_in_force(TimeInForce::Gtc)
            .with_bracket(limit_price, stop_price);
        // Bracket carries its own exits; nothing to synthesize.
        return Ok(EntryPlan {
            request,
            exit: None,
        });
    }

    if signal.has_exit_instruction() {
        require_whole_share()?;
        let request =
            OrderRequest::market_qty(&signal.ticker, side, sizing.qty).with_time_in_force(tif);
        return Ok(EntryPlan {
            request,
            exit: derive_exit(signal, side),
        });
    }

    let request = OrderRequest::market_notional(&signal.ticker, side, sizing.notional)
        .with_time_in_force(tif);
    Ok(EntryPlan {
        request,
        exit: None,
    })
}

/// Pick the single exit shape for a non-bracket entry.
///
/// Sell-side entries never get a synthesized exit. Stop-loss wins over
/// take-profit, which wins over trailing stop.
fn derive_exit(signal: &TradeSignal, side: OrderSide) -> Option<ExitSpec> {
    if side == OrderSide::Sell {
        return None;
    }
    if let Some(sl) = signal.stop_loss_pct {
        return Some(ExitSpec::StopLoss(sl));
    }
    if let Some(tp) = signal.take_profit_pct {
        return Some(ExitSpec::TakeProfit(tp));
    }
    signal.trailing_stop_pct.map(ExitSpec::TrailingStop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetClass, MarketPosition, OrderType};
    use rust_decimal_macros::dec;

    fn sizing(notional: Decimal, qty: Decimal) -> SignalSizing {
        SignalSizing { notional, qty }
    }

    fn signal() -> TradeSignal {
        TradeSignal {
            ticker: "AAPL".to_string(),
            action: Action::Buy,
            market_position: MarketPosition::Long,
            price: dec!(100),
            buying_power_pct: dec!(0.5),
            leveraged: false,
            asset_class: AssetClass::Stock,
            stop_loss_pct: None,
            take_profit_pct: None,
            trailing_stop_pct: None,
            max_slippage_pct: None,
            high: None,
            nickname: None,
        }
    }

    #[test]
    fn default_entry_is_notional_market() {
        let plan = entry_plan(&signal(), &sizing(dec!(500.00), dec!(5)), false).unwrap();
        assert_eq!(plan.request.order_type, OrderType::Market);
        assert_eq!(plan.request.notional, Some(dec!(500.00)));
        assert!(plan.request.qty.is_none());
        assert_eq!(plan.request.time_in_force, TimeInForce::Day);
        assert!(plan.exit.is_none());
    }

    #[test]
    fn crypto_entry_is_gtc() {
        let mut sig = signal();
        sig.asset_class = AssetClass::Crypto;
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), false).unwrap();
        assert_eq!(plan.request.time_in_force, TimeInForce::Gtc);
    }

    #[test]
    fn stop_loss_and_take_profit_build_bracket() {
        let mut sig = signal();
        sig.stop_loss_pct = Some(dec!(0.05));
        sig.take_profit_pct = Some(dec!(0.10));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), false).unwrap();

        assert!(plan.request.is_bracket());
        assert_eq!(plan.request.qty, Some(dec!(5)));
        assert_eq!(plan.request.time_in_force, TimeInForce::Gtc);
        let legs = plan.request.bracket.unwrap();
        assert_eq!(legs.stop_loss_stop, dec!(95.00));
        assert_eq!(legs.take_profit_limit, dec!(110.00));
        // Atomic bracket: no separate exit step.
        assert!(plan.exit.is_none());
    }

    #[test]
    fn bracket_not_built_during_extended_hours() {
        let mut sig = signal();
        sig.stop_loss_pct = Some(dec!(0.05));
        sig.take_profit_pct = Some(dec!(0.10));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), true).unwrap();

        assert!(!plan.request.is_bracket());
        assert_eq!(plan.request.order_type, OrderType::Limit);
        assert!(plan.request.extended_hours);
        // Stop-loss wins the single-exit derivation after the fill.
        assert_eq!(plan.exit, Some(ExitSpec::StopLoss(dec!(0.05))));
    }

    #[test]
    fn extended_hours_limit_uses_high_with_price_fallback() {
        let mut sig = signal();
        sig.high = Some(dec!(101.40));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), true).unwrap();
        assert_eq!(plan.request.limit_price, Some(dec!(101.40)));

        sig.high = None;
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), true).unwrap();
        assert_eq!(plan.request.limit_price, Some(dec!(100)));
    }

    #[test]
    fn crypto_outside_regular_session_never_brackets() {
        let mut sig = signal();
        sig.asset_class = AssetClass::Crypto;
        sig.stop_loss_pct = Some(dec!(0.05));
        sig.take_profit_pct = Some(dec!(0.10));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), true).unwrap();

        assert!(!plan.request.is_bracket());
        assert_eq!(plan.request.order_type, OrderType::Market);
        assert_eq!(plan.request.qty, Some(dec!(5)));
        assert_eq!(plan.request.time_in_force, TimeInForce::Gtc);
        assert_eq!(plan.exit, Some(ExitSpec::StopLoss(dec!(0.05))));
    }

    #[test]
    fn extended_hours_crypto_stays_market() {
        let mut sig = signal();
        sig.asset_class = AssetClass::Crypto;
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), true).unwrap();
        assert_eq!(plan.request.order_type, OrderType::Market);
        assert!(!plan.request.extended_hours);
    }

    #[test]
    fn extended_hours_requires_whole_share() {
        let err = entry_plan(&signal(), &sizing(dec!(50.00), Decimal::ZERO), true).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidQuantity { .. }));
    }

    #[test]
    fn single_stop_loss_entry_is_share_sized_with_exit() {
        let mut sig = signal();
        sig.stop_loss_pct = Some(dec!(0.05));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), false).unwrap();

        assert_eq!(plan.request.order_type, OrderType::Market);
        assert_eq!(plan.request.qty, Some(dec!(5)));
        assert!(plan.request.notional.is_none());
        assert_eq!(plan.exit, Some(ExitSpec::StopLoss(dec!(0.05))));
    }

    #[test]
    fn take_profit_only_yields_take_profit_exit() {
        let mut sig = signal();
        sig.take_profit_pct = Some(dec!(0.08));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), false).unwrap();
        assert_eq!(plan.exit, Some(ExitSpec::TakeProfit(dec!(0.08))));
    }

    #[test]
    fn trailing_stop_only_yields_trailing_exit() {
        let mut sig = signal();
        sig.trailing_stop_pct = Some(dec!(0.02));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), false).unwrap();
        assert_eq!(plan.exit, Some(ExitSpec::TrailingStop(dec!(0.02))));
    }

    #[test]
    fn sell_side_never_synthesizes_exits() {
        let mut sig = signal();
        sig.action = Action::Sell;
        sig.market_position = MarketPosition::Short;
        sig.stop_loss_pct = Some(dec!(0.05));
        let plan = entry_plan(&sig, &sizing(dec!(500.00), dec!(5)), false).unwrap();
        assert_eq!(plan.request.side, OrderSide::Sell);
        assert!(plan.exit.is_none());
    }
}
