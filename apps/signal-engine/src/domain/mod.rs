//! Domain layer - core types with no external service dependencies.

pub mod account;
pub mod order;
pub mod position;
pub mod quote;
pub mod signal;

pub use account::{AccountSnapshot, MarketClock};
pub use order::{BrokerOrder, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use position::{Position, PositionSide};
pub use quote::Quote;
pub use signal::{Action, AssetClass, MarketPosition, TradeSignal};
