//! Application configuration.
//!
//! Loads from `config.toml` at the project root. Venue settings (catalog,
//! dry-run, balance) stay in the environment; this file only drives the
//! binary's feed and strategy.

use serde::Deserialize;
use std::path::Path;

use crate::core::{Error, Result};
use crate::feeds::rest_client::BINANCE_API_URL;
use crate::strategies::UpDownConfig;

/// Candle feed settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    /// Binance REST base URL
    #[serde(default = "default_binance_url")]
    pub binance_url: String,
}

fn default_binance_url() -> String {
    BINANCE_API_URL.to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            binance_url: default_binance_url(),
        }
    }
}

/// Top-level config file structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub updown: UpDownConfig,
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load from the default location (project root config.toml).
    pub fn load_default() -> Self {
        let candidates = [
            "config.toml",
            concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml"),
        ];

        for path in &candidates {
            if let Ok(cfg) = Self::load(Path::new(path)) {
                tracing::info!("📋 Loaded config from {}", path);
                return cfg;
            }
        }

        tracing::warn!("⚠️ No config.toml found, using defaults");
        Self::default()
    }
}
