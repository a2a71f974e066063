//! REST client for Binance candles

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crate::core::{ExchangeName, Interval, KLine, Result, Symbol};
use crate::feeds::KLineSource;

pub const BINANCE_API_URL: &str = "https://api.binance.com/api";

/// Binance REST kline feed
pub struct BinanceKLineFeed {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceKLineFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for BinanceKLineFeed {
    fn default() -> Self {
        Self::new(BINANCE_API_URL)
    }
}

#[async_trait]
impl KLineSource for BinanceKLineFeed {
    async fn fetch_klines(&self, symbol: &str, interval: Interval, limit: usize) -> Result<Vec<KLine>> {
        let url = format!("{}/v3/klines", self.base_url);
        let limit = limit.to_string();
        let body = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", interval.as_str()), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let rows: Vec<Value> = serde_json::from_str(&body)?;
        let klines: Vec<KLine> = rows
            .iter()
            .filter_map(|row| parse_kline_row(symbol, interval, row, Utc::now()))
            .collect();
        debug!(symbol, interval = %interval, count = klines.len(), "Fetched binance klines");
        Ok(klines)
    }

    fn name(&self) -> &str {
        "binance"
    }
}

/// Parse one `/v3/klines` row:
/// `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
/// The candle counts as closed once `closeTime` is behind `now`.
pub fn parse_kline_row(symbol: &str, interval: Interval, row: &Value, now: DateTime<Utc>) -> Option<KLine> {
    let arr = row.as_array()?;
    let millis = |idx: usize| arr.get(idx)?.as_i64().and_then(DateTime::from_timestamp_millis);
    let decimal = |idx: usize| Decimal::from_str(arr.get(idx)?.as_str()?).ok();

    let end_time = millis(6)?;
    Some(KLine {
        exchange: ExchangeName::Binance,
        symbol: Symbol::new(symbol),
        interval,
        start_time: millis(0)?,
        end_time,
        open: decimal(1)?,
        high: decimal(2)?,
        low: decimal(3)?,
        close: decimal(4)?,
        volume: decimal(5)?,
        closed: end_time < now,
    })
}
