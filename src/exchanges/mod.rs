//! Exchange implementations - Pluggable exchange adapters

pub mod polymarket;

pub use polymarket::Polymarket;
