//! Exit order synthesis from a filled entry.

use rust_decimal::Decimal;

use super::errors::ValidationError;
use super::translate::ExitSpec;
use crate::application::ports::OrderRequest;
use crate::domain::{BrokerOrder, OrderSide, TimeInForce};

/// Build the single exit order for a filled buy-side entry.
///
/// Prices derive from the entry's average fill price, not the signal's
/// reference price, so the protective band tracks what was actually paid.
/// The exit always sells the full filled quantity, good till canceled.
///
/// # Errors
///
/// `InvalidSignal` when the broker reported a fill without an average
/// fill price; there is no sane price to anchor the exit to.
pub fn exit_order(spec: ExitSpec, entry: &BrokerOrder) -> Result<OrderRequest, ValidationError> {
    let fill_price = entry
        .filled_avg_price
        .ok_or_else(|| ValidationError::InvalidSignal {
            reason: format!("filled order {} has no average fill price", entry.id),
        })?;
    let qty = entry.filled_qty;

    let request = match spec {
        ExitSpec::StopLoss(pct) => {
            let stop_price = (fill_price * (Decimal::ONE - pct)).round_dp(2);
            OrderRequest::stop(&entry.symbol, OrderSide::Sell, qty, stop_price)
        }
        ExitSpec::TakeProfit(pct) => {
            let limit_price = (fill_price * (Decimal::ONE + pct)).round_dp(2);
            let stop_price = (fill_price * (Decimal::ONE - pct)).round_dp(2);
            OrderRequest::stop_limit(&entry.symbol, OrderSide::Sell, qty, stop_price, limit_price)
        }
        ExitSpec::TrailingStop(pct) => {
            // The broker wants the trail as a whole-number percent.
            let trail_percent = pct * Decimal::ONE_HUNDRED;
            OrderRequest::trailing_stop(&entry.symbol, OrderSide::Sell, qty, trail_percent)
        }
    };

    Ok(request.with_time_in_force(TimeInForce::Gtc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, OrderType};
    use rust_decimal_macros::dec;

    fn filled_entry(avg_price: Option<Decimal>) -> BrokerOrder {
        BrokerOrder {
            id: "entry-1".to_string(),
            symbol: "AAPL".to_string(),
            side: OrderSide::Buy,
            qty: Some(dec!(5)),
            filled_qty: dec!(5),
            filled_avg_price: avg_price,
            status: OrderStatus::Filled,
        }
    }

    #[test]
    fn stop_loss_exit_prices_off_fill() {
        let request =
            exit_order(ExitSpec::StopLoss(dec!(0.05)), &filled_entry(Some(dec!(102.00)))).unwrap();
        assert_eq!(request.order_type, OrderType::Stop);
        assert_eq!(request.side, OrderSide::Sell);
        assert_eq!(request.qty, Some(dec!(5)));
        assert_eq!(request.stop_price, Some(dec!(96.90)));
        assert_eq!(request.time_in_force, TimeInForce::Gtc);
    }

    #[test]
    fn take_profit_exit_is_symmetric_stop_limit() {
        let request =
            exit_order(ExitSpec::TakeProfit(dec!(0.10)), &filled_entry(Some(dec!(100)))).unwrap();
        assert_eq!(request.order_type, OrderType::StopLimit);
        assert_eq!(request.limit_price, Some(dec!(110.00)));
        assert_eq!(request.stop_price, Some(dec!(90.00)));
    }

    #[test]
    fn trailing_exit_converts_fraction_to_percent() {
        let request =
            exit_order(ExitSpec::TrailingStop(dec!(0.02)), &filled_entry(Some(dec!(100))))
                .unwrap();
        assert_eq!(request.order_type, OrderType::TrailingStop);
        assert_eq!(request.trail_percent, Some(dec!(2.00)));
        assert!(request.stop_price.is_none());
    }

    #[test]
    fn exit_sells_filled_quantity_not_requested() {
        let mut entry = filled_entry(Some(dec!(100)));
        entry.filled_qty = dec!(3);
        let request = exit_order(ExitSpec::StopLoss(dec!(0.05)), &entry).unwrap();
        assert_eq!(request.qty, Some(dec!(3)));
    }

    #[test]
    fn missing_fill_price_is_an_error() {
        let err = exit_order(ExitSpec::StopLoss(dec!(0.05)), &filled_entry(None)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSignal { .. }));
    }
}
