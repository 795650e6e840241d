// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Signal Engine - Core Library
//!
//! Converts inbound trade signals into broker order submissions and keeps
//! held positions reconciled with what the signals ask for.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core types with no external service dependencies
//!   - `signal`: inbound trade signal and its enumerations
//!   - `order` / `position` / `account` / `quote`: broker snapshots
//!
//! - **Application**: Port definitions
//!   - `ports`: `BrokerPort` for order routing, `QuoteProviderPort` for the
//!     slippage guard
//!
//! - **Execution**: The pipeline that drives one signal end to end
//!   - `sizing`: buying-power sizing (notional and whole shares)
//!   - `risk`: pattern-day-trade and slippage gates
//!   - `reconcile`: desired-vs-held position decisions
//!   - `translate`: entry order shapes (market / limit / bracket)
//!   - `fill_waiter`: bounded fill polling
//!   - `exits`: protective exit synthesis from the average fill price
//!   - `recovery`: liquidation when the exit step fails
//!
//! - **Infrastructure**: Adapters
//!   - `broker::alpaca`: Alpaca Markets REST adapter
//!   - `accounts`: per-account executor registry

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - core types with no external service dependencies.
pub mod domain;

/// Application layer - port definitions.
pub mod application;

/// Execution pipeline - signal to submitted orders.
pub mod execution;

/// Engine configuration.
pub mod config;

/// Infrastructure layer - adapters for external services.
pub mod infrastructure;

// Domain re-exports
pub use domain::{
    AccountSnapshot, Action, AssetClass, BrokerOrder, MarketClock, MarketPosition, OrderSide,
    OrderStatus, OrderType, Position, PositionSide, Quote, TimeInForce, TradeSignal,
};

// Application re-exports
pub use application::ports::{BrokerError, BrokerPort, ExitLeg, OrderRequest, QuoteProviderPort};

// Execution re-exports
pub use execution::{
    ExecutionError, ExecutionOutcome, FillWaiter, RiskViolation, TradeExecutor, ValidationError,
};

// Configuration re-exports
pub use config::{AccountCredentials, ConfigError, EngineConfig, ExecutionSettings, PdtSettings};

// Infrastructure re-exports
pub use infrastructure::accounts::AccountRegistry;
pub use infrastructure::broker::alpaca::{
    AlpacaBrokerAdapter, AlpacaConfig, AlpacaEnvironment, AlpacaError,
};
