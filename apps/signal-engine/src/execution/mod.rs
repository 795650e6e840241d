//! Execution pipeline.
//!
//! Turns a validated trade signal into broker submissions: risk gates,
//! sizing, position reconciliation, entry translation, fill waiting, exit
//! synthesis, and liquidation recovery when the exit step fails.

pub mod errors;
pub mod exits;
pub mod fill_waiter;
pub mod locks;
pub mod reconcile;
pub mod recovery;
pub mod risk;
pub mod sizing;
pub mod translate;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::ports::{BrokerPort, QuoteProviderPort};
use crate::config::ExecutionSettings;
use crate::domain::{BrokerOrder, OrderStatus, PositionSide, TradeSignal};

pub use errors::{ExecutionError, RiskViolation, ValidationError};
pub use fill_waiter::FillWaiter;
pub use locks::SymbolLocks;
pub use reconcile::ReconcileAction;
pub use risk::SlippageCheck;

/// Result of a completed execution.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The desired position was already held (or flat was requested);
    /// nothing was submitted.
    NoOp {
        /// Ticker the signal addressed.
        ticker: String,
        /// Side currently held.
        held: PositionSide,
    },
    /// Orders were submitted.
    Executed {
        /// Last known state of the entry order.
        entry: BrokerOrder,
        /// Synthesized exit order, when one was required and submitted.
        exit: Option<BrokerOrder>,
    },
}

/// Drives one signal end to end against a single broker account.
///
/// Executions for the same ticker serialize on a per-symbol lock; different
/// tickers proceed concurrently.
pub struct TradeExecutor<B, Q> {
    broker: Arc<B>,
    quotes: Arc<Q>,
    settings: ExecutionSettings,
    fill_waiter: FillWaiter,
    locks: SymbolLocks,
}

impl<B, Q> TradeExecutor<B, Q>
where
    B: BrokerPort,
    Q: QuoteProviderPort,
{
    /// Create an executor over a broker and quote source.
    #[must_use]
    pub fn new(broker: Arc<B>, quotes: Arc<Q>, settings: ExecutionSettings) -> Self {
        let fill_waiter = FillWaiter::new(settings.poll_interval(), settings.fill_deadline());
        Self {
            broker,
            quotes,
            settings,
            fill_waiter,
            locks: SymbolLocks::new(),
        }
    }

    /// Execute one trade signal.
    ///
    /// # Errors
    ///
    /// Validation and risk rejections happen before any broker mutation.
    /// Broker failures after the entry filled run liquidation recovery and
    /// surface as [`ExecutionError::PartialExecution`].
    pub async fn execute(&self, signal: &TradeSignal) -> Result<ExecutionOutcome, ExecutionError> {
        signal
            .validate()
            .map_err(|reason| ValidationError::InvalidSignal { reason })?;

        let _guard = self.locks.acquire(&signal.ticker).await;
        tracing::info!(
            ticker = %signal.ticker,
            action = ?signal.action,
            market_position = ?signal.market_position,
            "Executing trade signal"
        );

        let account = self.broker.get_account().await?;
        risk::check_day_trades(&account, &self.settings.pdt)?;
        let sizing = sizing::size_signal(signal, &account)?;

        let clock = self.broker.get_clock().await?;
        let extended_hours = clock.is_extended_hours();

        let existing = self.broker.get_open_position(&signal.ticker).await?;
        match reconcile::decide(existing.as_ref(), signal.market_position) {
            ReconcileAction::NoOp { held } => {
                tracing::info!(
                    ticker = %signal.ticker,
                    held = %held,
                    "Position already reconciled, nothing to do"
                );
                return Ok(ExecutionOutcome::NoOp {
                    ticker: signal.ticker.clone(),
                    held,
                });
            }
            ReconcileAction::OpenFresh => {
                // Only a fresh open gets the slippage gate; flips and
                // liquidations must go through regardless of drift.
                if let SlippageCheck::Rejected(violation) =
                    risk::check_slippage(signal, self.quotes.as_ref()).await?
                {
                    return Err(violation.into());
                }
            }
            ReconcileAction::CloseThenOpen { held } => {
                self.flatten(&signal.ticker, held).await;
            }
        }

        let plan = translate::entry_plan(signal, &sizing, extended_hours)?;
        tracing::info!(
            ticker = %signal.ticker,
            order_type = ?plan.request.order_type,
            qty = ?plan.request.qty,
            notional = ?plan.request.notional,
            extended_hours = plan.request.extended_hours,
            bracket = plan.request.is_bracket(),
            "Submitting entry order"
        );
        let entry = self.broker.submit_order(plan.request).await?;

        let Some(exit_spec) = plan.exit else {
            return Ok(ExecutionOutcome::Executed { entry, exit: None });
        };

        // Snapshot before the wait so recovery still has a usable state
        // if the status refresh itself fails.
        let last_known = entry.clone();
        let entry = match self.fill_waiter.wait(self.broker.as_ref(), entry).await {
            Ok(order) => order,
            Err(err) => return self.fail_with_recovery(last_known, err.into()).await,
        };

        if entry.status != OrderStatus::Filled {
            tracing::warn!(
                order_id = %entry.id,
                status = %entry.status,
                "Entry did not fill in time, canceling"
            );
            return match self.broker.cancel_order(&entry.id).await {
                Ok(()) => Ok(ExecutionOutcome::Executed {
                    entry: entry.into_canceled(),
                    exit: None,
                }),
                Err(err) => self.fail_with_recovery(entry, err.into()).await,
            };
        }

        let exit_request = match exits::exit_order(exit_spec, &entry) {
            Ok(request) => request,
            Err(err) => return self.fail_with_recovery(entry, err.into()).await,
        };
        match self.broker.submit_order(exit_request).await {
            Ok(exit) => {
                tracing::info!(
                    entry_id = %entry.id,
                    exit_id = %exit.id,
                    "Entry filled and exit order placed"
                );
                Ok(ExecutionOutcome::Executed {
                    entry,
                    exit: Some(exit),
                })
            }
            Err(err) => self.fail_with_recovery(entry, err.into()).await,
        }
    }

    /// Close an opposite-side holding before opening the new one.
    ///
    /// Close failures are soft: the entry proceeds and the broker rejects
    /// it if the account really cannot support both sides.
    async fn flatten(&self, ticker: &str, held: PositionSide) {
        tracing::info!(ticker = %ticker, held = %held, "Closing opposite-side position");
        match self.broker.close_position(ticker, Decimal::ONE_HUNDRED).await {
            Ok(Some(close)) => {
                match self.fill_waiter.wait(self.broker.as_ref(), close).await {
                    Ok(close) if close.status == OrderStatus::Filled => {}
                    Ok(close) => {
                        tracing::warn!(
                            ticker = %ticker,
                            status = %close.status,
                            "Close order did not fill in time, proceeding with entry"
                        );
                    }
                    Err(err) => {
                        tracing::warn!(
                            ticker = %ticker,
                            error = %err,
                            "Lost track of close order, proceeding with entry"
                        );
                    }
                }
            }
            Ok(None) => {
                tracing::warn!(ticker = %ticker, "Broker reported no position to close");
            }
            Err(err) => {
                tracing::warn!(
                    ticker = %ticker,
                    error = %err,
                    "Close request failed, proceeding with entry"
                );
            }
        }
    }

    /// Liquidate the entry's fill and wrap the original failure.
    ///
    /// The source error propagates unchanged when nothing had filled.
    async fn fail_with_recovery(
        &self,
        entry: BrokerOrder,
        source: ExecutionError,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        match recovery::liquidate_entry(self.broker.as_ref(), &entry).await {
            Ok(Some(liquidation)) => Err(ExecutionError::PartialExecution {
                entry,
                liquidation: Some(liquidation),
                source: Box::new(source),
            }),
            Ok(None) => Err(source),
            Err(liquidation_err) => {
                tracing::error!(
                    order_id = %entry.id,
                    symbol = %entry.symbol,
                    error = %liquidation_err,
                    "Liquidation failed, position may be unprotected"
                );
                Err(ExecutionError::PartialExecution {
                    entry,
                    liquidation: None,
                    source: Box::new(source),
                })
            }
        }
    }
}
