//! Error handling - Flat, descriptive errors returned straight to the host

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Adapter error hierarchy
#[derive(Debug, Error)]
pub enum Error {
    /// A configured file could not be read
    #[error("polymarket: read {key} failed: {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON matched neither accepted shape, or a record is invalid
    #[error("polymarket: decode markets json failed: {0}")]
    Decode(String),

    /// Operation has no implementation on this venue
    #[error("polymarket: {0}")]
    Unsupported(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
