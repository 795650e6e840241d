//! Ports (driven interfaces) for external collaborators.

mod broker_port;
mod quote_provider_port;

pub use broker_port::{BrokerError, BrokerPort, ExitLeg, OrderRequest};
pub use quote_provider_port::QuoteProviderPort;
