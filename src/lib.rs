//! AlephTX Polymarket - Exchange adapter library
//! Dry-run order ledger and market catalog for the Polymarket venue

// Public modules
pub mod core;
pub mod config;
pub mod exchanges;
pub mod feeds;
pub mod strategies;

// Re-exports
pub use crate::core::{Error, Result};
pub use config::AppConfig;
pub use exchanges::Polymarket;
