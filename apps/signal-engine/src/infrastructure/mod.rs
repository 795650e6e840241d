//! Infrastructure layer - adapters for external services.

pub mod accounts;
pub mod broker;
