//! Alpaca Markets broker integration.

pub mod adapter;
pub mod api_types;
pub mod config;
pub mod error;
pub mod http_client;

pub use adapter::AlpacaBrokerAdapter;
pub use config::{AlpacaConfig, AlpacaEnvironment, RetryConfig};
pub use error::AlpacaError;
