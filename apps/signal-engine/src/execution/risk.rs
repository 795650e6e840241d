//! Risk gates evaluated before any order submission.
//!
//! Two independent checks: the pattern-day-trade guard and the slippage
//! guard. Both reject the trade outright; no partial execution happens
//! after a refusal.

use rust_decimal::Decimal;

use super::errors::RiskViolation;
use crate::application::ports::{BrokerError, QuoteProviderPort};
use crate::config::PdtSettings;
use crate::domain::{AccountSnapshot, Action, TradeSignal};

/// Outcome of the slippage guard.
#[derive(Debug)]
pub enum SlippageCheck {
    /// Guard disabled or within tolerance.
    Passed,
    /// Deviation exceeded the signal's tolerance.
    Rejected(RiskViolation),
}

/// Pattern-day-trade guard.
///
/// Blocks when the account has used `max_day_trades` day trades and equity
/// is strictly under the threshold. An account at the threshold exactly is
/// allowed. Buying is technically always possible, but a fill we could not
/// exit the same day would strand the position, so the whole trade is
/// refused up front.
///
/// # Errors
///
/// `PatternDayTraderBlocked` when the limit applies.
pub fn check_day_trades(
    account: &AccountSnapshot,
    settings: &PdtSettings,
) -> Result<(), RiskViolation> {
    if account.daytrade_count >= settings.max_day_trades
        && account.equity < settings.equity_threshold
    {
        return Err(RiskViolation::PatternDayTraderBlocked {
            day_trade_count: account.daytrade_count,
            equity: account.equity,
            threshold: settings.equity_threshold,
        });
    }
    Ok(())
}

/// Slippage guard, applied only when opening a fresh position.
///
/// Sells are measured against the bid, buys against the ask. Deviation
/// equal to the tolerance passes; only a strictly greater deviation
/// rejects.
///
/// # Errors
///
/// Returns the broker error when the quote lookup fails.
pub async fn check_slippage<Q: QuoteProviderPort + ?Sized>(
    signal: &TradeSignal,
    quotes: &Q,
) -> Result<SlippageCheck, BrokerError> {
    let Some(max_slippage) = signal.max_slippage_pct else {
        return Ok(SlippageCheck::Passed);
    };
    if max_slippage <= Decimal::ZERO {
        return Ok(SlippageCheck::Passed);
    }

    let quote = quotes
        .latest_quote(&signal.ticker, signal.asset_class)
        .await?;
    let quote_price = match signal.action {
        Action::Sell => quote.bid_price,
        Action::Buy => quote.ask_price,
    };

    let slippage = ((quote_price - signal.price) / signal.price).abs();
    tracing::debug!(
        ticker = %signal.ticker,
        signal_price = %signal.price,
        quote_price = %quote_price,
        slippage = %slippage,
        "Slippage check"
    );

    if slippage > max_slippage {
        return Ok(SlippageCheck::Rejected(RiskViolation::SlippageExceeded {
            observed: slippage,
            limit: max_slippage,
        }));
    }
    Ok(SlippageCheck::Passed)
}
