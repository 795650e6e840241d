//! Bounded fill polling.

use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::{BrokerOrder, OrderStatus};

/// Bounded polling state machine for order status.
///
/// Refreshes the order every `interval` until a terminal status or the
/// wall-clock `deadline` elapses. The very first refresh is immediate
/// while the order is still `new`. On deadline the last observed snapshot
/// is returned as-is; cancellation is the caller's decision.
#[derive(Debug, Clone, Copy)]
pub struct FillWaiter {
    interval: Duration,
    deadline: Duration,
}

impl FillWaiter {
    /// Create a waiter with the given poll interval and hard deadline.
    #[must_use]
    pub const fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    /// Poll until the order reaches a terminal status or the deadline.
    ///
    /// # Errors
    ///
    /// Returns the broker error when a status refresh fails; the caller
    /// still knows the last state it observed.
    pub async fn wait<B: BrokerPort + ?Sized>(
        &self,
        broker: &B,
        mut order: BrokerOrder,
    ) -> Result<BrokerOrder, BrokerError> {
        let deadline = Instant::now() + self.deadline;

        loop {
            if order.status.is_terminal() {
                return Ok(order);
            }
            if Instant::now() >= deadline {
                tracing::warn!(
                    order_id = %order.id,
                    status = %order.status,
                    "Fill wait deadline reached, returning last observed status"
                );
                return Ok(order);
            }
            if order.status != OrderStatus::New {
                tokio::time::sleep(self.interval).await;
            }
            order = broker.get_order(&order.id).await?;
        }
    }
}

impl Default for FillWaiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OrderRequest;
    use crate::domain::{AccountSnapshot, MarketClock, OrderSide, Position};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    /// Broker stub that walks an order through a scripted status sequence.
    struct ScriptedBroker {
        statuses: Mutex<Vec<OrderStatus>>,
        polls: Mutex<u32>,
    }

    impl ScriptedBroker {
        fn new(statuses: Vec<OrderStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses),
                polls: Mutex::new(0),
            }
        }

        fn poll_count(&self) -> u32 {
            *self.polls.lock().unwrap()
        }
    }

    #[async_trait]
    impl BrokerPort for ScriptedBroker {
        async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
            unimplemented!()
        }

        async fn get_clock(&self) -> Result<MarketClock, BrokerError> {
            unimplemented!()
        }

        async fn get_open_position(
            &self,
            _symbol: &str,
        ) -> Result<Option<Position>, BrokerError> {
            unimplemented!()
        }

        async fn submit_order(&self, _request: OrderRequest) -> Result<BrokerOrder, BrokerError> {
            unimplemented!()
        }

        async fn get_order(&self, order_id: &str) -> Result<BrokerOrder, BrokerError> {
            *self.polls.lock().unwrap() += 1;
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.remove(0)
            } else {
                statuses[0]
            };
            Ok(order(order_id, status))
        }

        async fn cancel_order(&self, _order_id: &str) -> Result<(), BrokerError> {
            Ok(())
        }

        async fn close_position(
            &self,
            _symbol: &str,
            _percentage: Decimal,
        ) -> Result<Option<BrokerOrder>, BrokerError> {
            Ok(None)
        }
    }

    fn order(id: &str, status: OrderStatus) -> BrokerOrder {
        BrokerOrder {
            id: id.to_string(),
            symbol: "AAPL".to_string(),
            side: OrderSide::Buy,
            qty: Some(Decimal::new(5, 0)),
            filled_qty: Decimal::ZERO,
            filled_avg_price: None,
            status,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_status_returns_without_polling() {
        let broker = ScriptedBroker::new(vec![OrderStatus::Filled]);
        let waiter = FillWaiter::default();

        let result = waiter
            .wait(&broker, order("o-1", OrderStatus::Filled))
            .await
            .unwrap();

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(broker.poll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_refresh_skips_sleep_while_new() {
        let broker = ScriptedBroker::new(vec![OrderStatus::Filled]);
        let waiter = FillWaiter::default();
        let start = Instant::now();

        let result = waiter
            .wait(&broker, order("o-1", OrderStatus::New))
            .await
            .unwrap();

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(broker.poll_count(), 1);
        // No interval elapsed: the first check while `new` is immediate.
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_through_partial_fill_to_filled() {
        let broker = ScriptedBroker::new(vec![
            OrderStatus::Accepted,
            OrderStatus::PartiallyFilled,
            OrderStatus::Filled,
        ]);
        let waiter = FillWaiter::default();

        let result = waiter
            .wait(&broker, order("o-1", OrderStatus::New))
            .await
            .unwrap();

        assert_eq!(result.status, OrderStatus::Filled);
        assert_eq!(broker.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_returns_last_observed_status() {
        // Order never leaves accepted: the waiter must give up at the
        // deadline and hand back the non-terminal snapshot.
        let broker = ScriptedBroker::new(vec![OrderStatus::Accepted]);
        let waiter = FillWaiter::new(Duration::from_millis(250), Duration::from_secs(30));
        let start = Instant::now();

        let result = waiter
            .wait(&broker, order("o-1", OrderStatus::Accepted))
            .await
            .unwrap();

        assert_eq!(result.status, OrderStatus::Accepted);
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_secs(30));
        // Never more than one interval past the deadline.
        assert!(elapsed <= Duration::from_secs(30) + Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_error_propagates() {
        struct FailingBroker;

        #[async_trait]
        impl BrokerPort for FailingBroker {
            async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
                unimplemented!()
            }
            async fn get_clock(&self) -> Result<MarketClock, BrokerError> {
                unimplemented!()
            }
            async fn get_open_position(
                &self,
                _symbol: &str,
            ) -> Result<Option<Position>, BrokerError> {
                unimplemented!()
            }
            async fn submit_order(
                &self,
                _request: OrderRequest,
            ) -> Result<BrokerOrder, BrokerError> {
                unimplemented!()
            }
            async fn get_order(&self, _order_id: &str) -> Result<BrokerOrder, BrokerError> {
                Err(BrokerError::RateLimited)
            }
            async fn cancel_order(&self, _order_id: &str) -> Result<(), BrokerError> {
                Ok(())
            }
            async fn close_position(
                &self,
                _symbol: &str,
                _percentage: Decimal,
            ) -> Result<Option<BrokerOrder>, BrokerError> {
                Ok(None)
            }
        }

        let waiter = FillWaiter::default();
        let result = waiter
            .wait(&FailingBroker, order("o-1", OrderStatus::New))
            .await;
        assert!(matches!(result, Err(BrokerError::RateLimited)));
    }
}
