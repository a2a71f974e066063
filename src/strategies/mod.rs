//! Trading strategies

pub mod btc_updown;

pub use btc_updown::{UpDownConfig, UpDownStrategy};
