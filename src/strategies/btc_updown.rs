//! BTC up/down connectivity strategy
//!
//! Candles come from Binance; when a candle closes up the strategy buys the
//! YES outcome on Polymarket, otherwise the NO outcome. With the adapter in
//! dry-run mode (the default) nothing reaches the venue.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::core::{Error, Exchange, Interval, KLine, Order, Result, Side, SubmitOrder, Symbol};
use crate::feeds::KLineSource;

pub const ID: &str = "polymarket-btc15m-updown";

/// Strategy parameters (`[updown]` in config.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpDownConfig {
    /// Binance symbol driving the signal
    pub source_symbol: String,
    pub interval: Interval,
    /// Polymarket symbols bought on an up / down candle
    pub yes_symbol: String,
    pub no_symbol: String,
    /// Probability price (0..1)
    pub entry_price: Decimal,
    /// USDC staked per signal; quantity = quote_amount / entry_price
    pub quote_amount: Decimal,
    pub poll_interval_secs: u64,
}

impl Default for UpDownConfig {
    fn default() -> Self {
        Self {
            source_symbol: "BTCUSDT".to_string(),
            interval: Interval::M15,
            yes_symbol: "PM_BTC_15M_UP_YES_USDC".to_string(),
            no_symbol: "PM_BTC_15M_UP_NO_USDC".to_string(),
            entry_price: Decimal::new(5, 1),
            quote_amount: Decimal::from(5),
            poll_interval_secs: 30,
        }
    }
}

impl UpDownConfig {
    /// Replace blank or zero values with defaults
    pub fn defaults(&mut self) {
        let d = Self::default();
        if self.source_symbol.is_empty() {
            self.source_symbol = d.source_symbol;
        }
        if self.yes_symbol.is_empty() {
            self.yes_symbol = d.yes_symbol;
        }
        if self.no_symbol.is_empty() {
            self.no_symbol = d.no_symbol;
        }
        if self.entry_price.is_zero() {
            self.entry_price = d.entry_price;
        }
        if self.quote_amount.is_zero() {
            self.quote_amount = d.quote_amount;
        }
        if self.poll_interval_secs == 0 {
            self.poll_interval_secs = d.poll_interval_secs;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_symbol.is_empty() {
            return Err(Error::Config("sourceSymbol is required".into()));
        }
        if self.yes_symbol.is_empty() || self.no_symbol.is_empty() {
            return Err(Error::Config("yesSymbol/noSymbol is required".into()));
        }
        if self.entry_price <= Decimal::ZERO {
            return Err(Error::Config("entryPrice must be positive".into()));
        }
        if self.quote_amount <= Decimal::ZERO {
            return Err(Error::Config("quoteAmount must be positive".into()));
        }
        Ok(())
    }
}

pub struct UpDownStrategy {
    config: UpDownConfig,
    /// Close time of the last candle acted on (or the startup baseline)
    last_close: Mutex<Option<DateTime<Utc>>>,
}

impl UpDownStrategy {
    pub fn new(mut config: UpDownConfig) -> Result<Self> {
        config.defaults();
        config.validate()?;
        Ok(Self {
            config,
            last_close: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        ID
    }

    pub fn config(&self) -> &UpDownConfig {
        &self.config
    }

    /// Order for a closed candle, `None` if the candle is not ours
    pub fn signal(&self, kline: &KLine) -> Option<SubmitOrder> {
        if kline.symbol.as_str() != self.config.source_symbol || kline.interval != self.config.interval {
            return None;
        }

        let target = if kline.close > kline.open {
            &self.config.yes_symbol
        } else {
            &self.config.no_symbol
        };
        let quantity = self.config.quote_amount / self.config.entry_price;

        Some(
            SubmitOrder::limit(Symbol::new(target.as_str()), Side::Buy, self.config.entry_price, quantity)
                .with_tag(ID),
        )
    }

    pub async fn on_kline_closed(&self, kline: &KLine, exchange: &dyn Exchange) -> Result<Option<Order>> {
        let Some(order) = self.signal(kline) else {
            return Ok(None);
        };

        info!(
            source = %self.config.source_symbol,
            interval = %self.config.interval,
            open = %kline.open,
            close = %kline.close,
            target_symbol = %order.symbol,
            entry_price = %self.config.entry_price,
            quote_amount = %self.config.quote_amount,
            order_quantity = %order.quantity,
            "signal generated, submitting polymarket order"
        );

        match exchange.submit_order(order).await {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                error!(error = %e, "failed to submit polymarket order");
                Err(e)
            }
        }
    }

    /// Check the newest closed candle and act on it if it is new. The first
    /// call only records a baseline so a stale candle never fires.
    pub async fn poll_once(&self, feed: &dyn KLineSource, exchange: &dyn Exchange) -> Result<Option<Order>> {
        let Some(kline) = feed
            .latest_closed(&self.config.source_symbol, self.config.interval)
            .await?
        else {
            return Ok(None);
        };

        {
            let mut last = self.last_close.lock();
            match *last {
                None => {
                    debug!(close_time = %kline.end_time, "Baseline candle recorded");
                    *last = Some(kline.end_time);
                    return Ok(None);
                }
                Some(t) if kline.end_time <= t => return Ok(None),
                Some(_) => *last = Some(kline.end_time),
            }
        }

        self.on_kline_closed(&kline, exchange).await
    }

    /// Make sure both outcome symbols are listed on the venue
    pub async fn check_markets(&self, exchange: &dyn Exchange) -> Result<()> {
        let markets = exchange.query_markets().await?;
        for symbol in [&self.config.yes_symbol, &self.config.no_symbol] {
            if !markets.contains_key(symbol.as_str()) {
                return Err(Error::Config(format!(
                    "{} market {} not found",
                    exchange.name(),
                    symbol
                )));
            }
        }
        Ok(())
    }

    /// Poll until `shutdown` flips to true.
    pub async fn run(
        &self,
        feed: &dyn KLineSource,
        exchange: &dyn Exchange,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        self.check_markets(exchange).await?;
        info!(
            strategy = ID,
            feed = feed.name(),
            venue = %exchange.name(),
            "Strategy running"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.poll_interval_secs));
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once(feed, exchange).await {
                        warn!(error = %e, "Strategy poll failed");
                    }
                }
            }
        }

        info!(strategy = ID, "Strategy stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExchangeName, StaticConfig};
    use crate::exchanges::polymarket::{ENV_DRY_RUN, Polymarket};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn kline(open: i64, close: i64, end_secs: i64) -> KLine {
        KLine {
            exchange: ExchangeName::Binance,
            symbol: Symbol::new("BTCUSDT"),
            interval: Interval::M15,
            start_time: Utc.timestamp_opt(end_secs - 900, 0).unwrap(),
            end_time: Utc.timestamp_opt(end_secs, 0).unwrap(),
            open: Decimal::from(open),
            high: Decimal::from(open.max(close)),
            low: Decimal::from(open.min(close)),
            close: Decimal::from(close),
            volume: Decimal::ONE,
            closed: true,
        }
    }

    /// Feed returning whatever candle was last pushed
    struct ScriptedFeed(Mutex<Option<KLine>>);

    #[async_trait]
    impl KLineSource for ScriptedFeed {
        async fn fetch_klines(&self, _symbol: &str, _interval: Interval, _limit: usize) -> Result<Vec<KLine>> {
            Ok(self.0.lock().clone().into_iter().collect())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn strategy() -> UpDownStrategy {
        UpDownStrategy::new(UpDownConfig::default()).unwrap()
    }

    #[test]
    fn test_defaults_and_validate() {
        let mut cfg = UpDownConfig {
            source_symbol: String::new(),
            entry_price: Decimal::ZERO,
            ..UpDownConfig::default()
        };
        cfg.defaults();
        assert_eq!(cfg, UpDownConfig::default());

        let bad = UpDownConfig {
            entry_price: Decimal::from(-1),
            ..UpDownConfig::default()
        };
        assert!(matches!(bad.validate(), Err(Error::Config(_))));
        assert!(UpDownStrategy::new(bad).is_err());
    }

    #[test]
    fn test_signal_routing() {
        let s = strategy();

        let up = s.signal(&kline(100, 110, 900)).unwrap();
        assert_eq!(up.symbol.as_str(), "PM_BTC_15M_UP_YES_USDC");
        assert_eq!(up.side, Side::Buy);
        assert_eq!(up.price, Decimal::new(5, 1));
        assert_eq!(up.quantity, Decimal::from(10));
        assert_eq!(up.tag.as_deref(), Some(ID));

        // flat counts as down
        let flat = s.signal(&kline(100, 100, 900)).unwrap();
        assert_eq!(flat.symbol.as_str(), "PM_BTC_15M_UP_NO_USDC");

        let mut other = kline(100, 110, 900);
        other.symbol = Symbol::new("ETHUSDT");
        assert!(s.signal(&other).is_none());

        let mut other = kline(100, 110, 900);
        other.interval = Interval::H1;
        assert!(s.signal(&other).is_none());
    }

    #[tokio::test]
    async fn test_poll_fires_once_per_new_candle() {
        let s = strategy();
        let ex = Polymarket::with_source("", "", "", Arc::new(StaticConfig::new()));
        let feed = ScriptedFeed(Mutex::new(Some(kline(100, 110, 900))));

        // baseline
        assert!(s.poll_once(&feed, &ex).await.unwrap().is_none());
        // same candle again
        assert!(s.poll_once(&feed, &ex).await.unwrap().is_none());

        *feed.0.lock() = Some(kline(110, 105, 1800));
        let order = s.poll_once(&feed, &ex).await.unwrap().unwrap();
        assert_eq!(order.order_id, 1);
        assert_eq!(order.symbol().as_str(), "PM_BTC_15M_UP_NO_USDC");

        assert!(s.poll_once(&feed, &ex).await.unwrap().is_none());
        assert_eq!(ex.query_open_orders("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_is_returned() {
        let s = strategy();
        let config = Arc::new(StaticConfig::new().with(ENV_DRY_RUN, "false"));
        let ex = Polymarket::with_source("", "", "", config);

        let err = s.on_kline_closed(&kline(1, 2, 900), &ex).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_check_markets() {
        let ex = Polymarket::with_source("", "", "", Arc::new(StaticConfig::new()));
        assert!(strategy().check_markets(&ex).await.is_ok());

        let custom = UpDownStrategy::new(UpDownConfig {
            yes_symbol: "MISSING".into(),
            ..UpDownConfig::default()
        })
        .unwrap();
        assert!(matches!(custom.check_markets(&ex).await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let s = strategy();
        let ex = Polymarket::with_source("", "", "", Arc::new(StaticConfig::new()));
        let feed = ScriptedFeed(Mutex::new(None));
        let (tx, rx) = watch::channel(false);

        tx.send(true).unwrap();
        s.run(&feed, &ex, rx).await.unwrap();
    }
}
