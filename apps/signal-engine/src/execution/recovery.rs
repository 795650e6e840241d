//! Failure recovery after a confirmed entry fill.
//!
//! If anything fails between the entry fill and the exit order landing,
//! the position is unprotected. Recovery liquidates whatever quantity
//! filled so the account is flat before the original error surfaces.

use crate::application::ports::{BrokerError, BrokerPort, OrderRequest};
use crate::domain::{BrokerOrder, OrderSide, OrderStatus, TimeInForce};

/// Liquidate exposure left behind by a failed exit-order step.
///
/// - entry `filled`: submit a market sell for the full filled quantity;
/// - entry `partially_filled`: cancel the remainder, then market-sell the
///   quantity that did fill;
/// - anything else: nothing was acquired, nothing to liquidate.
///
/// Returns the liquidation order when one was submitted.
///
/// # Errors
///
/// Returns the broker error when the liquidation itself fails; the caller
/// surfaces both that and the original failure.
pub async fn liquidate_entry<B: BrokerPort + ?Sized>(
    broker: &B,
    entry: &BrokerOrder,
) -> Result<Option<BrokerOrder>, BrokerError> {
    match entry.status {
        OrderStatus::Filled => {
            tracing::warn!(
                order_id = %entry.id,
                symbol = %entry.symbol,
                qty = %entry.filled_qty,
                "Liquidating filled entry after exit-order failure"
            );
            let sell = market_sell(entry);
            broker.submit_order(sell).await.map(Some)
        }
        OrderStatus::PartiallyFilled => {
            tracing::warn!(
                order_id = %entry.id,
                symbol = %entry.symbol,
                filled_qty = %entry.filled_qty,
                "Canceling remainder and liquidating partial fill after exit-order failure"
            );
            broker.cancel_order(&entry.id).await?;
            let sell = market_sell(entry);
            broker.submit_order(sell).await.map(Some)
        }
        _ => Ok(None),
    }
}

fn market_sell(entry: &BrokerOrder) -> OrderRequest {
    OrderRequest::market_qty(&entry.symbol, OrderSide::Sell, entry.filled_qty)
        .with_time_in_force(TimeInForce::Gtc)
}
