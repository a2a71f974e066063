//! Market data feeds - candle sources for signal generation

pub mod rest_client;

use async_trait::async_trait;

use crate::core::{Interval, KLine, Result};

pub use rest_client::BinanceKLineFeed;

/// Candle source trait
#[async_trait]
pub trait KLineSource: Send + Sync {
    /// Most recent `limit` candles, oldest first
    async fn fetch_klines(&self, symbol: &str, interval: Interval, limit: usize) -> Result<Vec<KLine>>;

    /// Newest candle that has already closed
    async fn latest_closed(&self, symbol: &str, interval: Interval) -> Result<Option<KLine>> {
        let klines = self.fetch_klines(symbol, interval, 2).await?;
        Ok(klines.into_iter().rev().find(|k| k.closed))
    }

    fn name(&self) -> &str;
}
