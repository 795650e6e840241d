//! Application layer - port definitions consumed by the execution core.

pub mod ports;

pub use ports::{BrokerError, BrokerPort, OrderRequest, QuoteProviderPort};
