//! Polymarket exchange adapter
//!
//! Minimal venue integration so the host pipeline can initialize sessions and
//! place orders against Polymarket:
//! - markets come from `POLYMARKET_MARKETS_FILE` / `POLYMARKET_MARKETS_JSON`
//!   (or a built-in example catalog)
//! - orders are dry-run only (default on) and live in an in-memory ledger
//!
//! Real CLOB authentication and order signing are not wired up; live mode
//! fails at submission.

pub mod account;
pub mod catalog;
pub mod gate;
pub mod ledger;
pub mod stream;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{
    Account, BalanceMap, ConfigSource, Error, Exchange, ExchangeFee, ExchangeName, Interval,
    KLine, KLineQueryOptions, MarketMap, MarketStream, Order, ProcessEnv, Result, SubmitOrder,
    Ticker,
};

pub use ledger::{OrderLedger, OrderStore};
pub use stream::PolymarketStream;

pub const ENV_MARKETS_FILE: &str = "POLYMARKET_MARKETS_FILE";
pub const ENV_MARKETS_JSON: &str = "POLYMARKET_MARKETS_JSON";
pub const ENV_DRY_RUN: &str = "POLYMARKET_DRY_RUN";
pub const ENV_BALANCE_USDC: &str = "POLYMARKET_BALANCE_USDC";

/// Polymarket settles in USDC
pub const SETTLEMENT_CURRENCY: &str = "USDC";

/// Shared state behind the adapter lock
struct State<S> {
    markets: Option<MarketMap>,
    store: S,
}

/// Polymarket adapter.
///
/// One mutex serializes catalog construction, ledger mutations and
/// open-order scans. Reads and writes exclude each other.
pub struct Polymarket<S = OrderLedger> {
    key: String,
    secret: String,
    passphrase: String,
    config: Arc<dyn ConfigSource>,
    state: Mutex<State<S>>,
}

impl Polymarket<OrderLedger> {
    /// Adapter reading its settings from the process environment
    pub fn new(key: impl Into<String>, secret: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self::with_source(key, secret, passphrase, Arc::new(ProcessEnv))
    }

    /// Adapter reading its settings from `config`
    pub fn with_source(
        key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self::with_store(key, secret, passphrase, config, OrderLedger::new())
    }
}

impl<S: OrderStore> Polymarket<S> {
    pub fn with_store(
        key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
        config: Arc<dyn ConfigSource>,
        store: S,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
            config,
            state: Mutex::new(State { markets: None, store }),
        }
    }

    /// Whether a full CLOB API credential triple was supplied
    pub fn has_credentials(&self) -> bool {
        !self.key.trim().is_empty()
            && !self.secret.trim().is_empty()
            && !self.passphrase.trim().is_empty()
    }

    /// Direct ledger lookup, including canceled orders
    pub fn order(&self, order_id: u64) -> Option<Order> {
        self.state.lock().store.get(order_id)
    }

    fn markets(&self) -> Result<MarketMap> {
        let mut state = self.state.lock();

        if let Some(markets) = state.markets.as_ref() {
            debug!(count = markets.len(), "Using cached polymarket markets");
            return Ok(markets.clone());
        }

        let mut markets = catalog::load_catalog(self.config.as_ref())?;
        if markets.is_empty() {
            info!("No polymarket markets configured, using built-in example markets");
            markets = catalog::default_markets();
        }
        catalog::normalize(&mut markets);

        state.markets = Some(markets.clone());
        Ok(markets)
    }
}

#[async_trait]
impl<S: OrderStore + 'static> Exchange for Polymarket<S> {
    fn name(&self) -> ExchangeName {
        ExchangeName::Polymarket
    }

    fn platform_fee_currency(&self) -> &str {
        SETTLEMENT_CURRENCY
    }

    fn default_fee_rates(&self) -> ExchangeFee {
        ExchangeFee {
            maker_fee_rate: Decimal::ZERO,
            taker_fee_rate: Decimal::ZERO,
        }
    }

    fn new_stream(&self) -> Box<dyn MarketStream> {
        Box::new(PolymarketStream::new())
    }

    async fn query_markets(&self) -> Result<MarketMap> {
        self.markets()
    }

    /// Placeholder ticker; no quote endpoint is called.
    async fn query_ticker(&self, _symbol: &str) -> Result<Ticker> {
        Ok(Ticker::empty_at(Utc::now()))
    }

    async fn query_tickers(&self, symbols: &[&str]) -> Result<HashMap<String, Ticker>> {
        let mut out = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let ticker = self.query_ticker(symbol).await?;
            out.insert(symbol.to_string(), ticker);
        }
        Ok(out)
    }

    async fn query_klines(
        &self,
        _symbol: &str,
        _interval: Interval,
        _options: KLineQueryOptions,
    ) -> Result<Vec<KLine>> {
        Err(Error::Unsupported(
            "QueryKLines is not implemented (use Binance session for kline source)".to_string(),
        ))
    }

    async fn query_account(&self) -> Result<Account> {
        Ok(account::snapshot(self.config.as_ref()))
    }

    async fn query_account_balances(&self) -> Result<BalanceMap> {
        let account = self.query_account().await?;
        Ok(account.into_balances())
    }

    async fn submit_order(&self, order: SubmitOrder) -> Result<Order> {
        gate::admit(gate::resolve_mode(self.config.as_ref()), self.has_credentials())?;

        let created = self.state.lock().store.submit(order);
        gate::log_created(&created);
        Ok(created)
    }

    async fn query_open_orders(&self, symbol: &str) -> Result<Vec<Order>> {
        Ok(self.state.lock().store.list_open(Some(symbol)))
    }

    async fn cancel_orders(&self, orders: &[Order]) -> Result<()> {
        let ids: Vec<u64> = orders.iter().map(|o| o.order_id).collect();
        self.state.lock().store.cancel(&ids);
        info!(count = ids.len(), "polymarket(dry-run) cancel requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderStatus, Side, StaticConfig, Symbol};

    fn adapter(config: Arc<StaticConfig>) -> Polymarket {
        Polymarket::with_source("", "", "", config)
    }

    fn request(symbol: &str) -> SubmitOrder {
        SubmitOrder::limit(symbol, Side::Buy, Decimal::new(5, 1), Decimal::from(10))
    }

    #[tokio::test]
    async fn test_default_catalog() {
        let ex = adapter(Arc::new(StaticConfig::new()));
        let markets = ex.query_markets().await.unwrap();

        let mut symbols: Vec<&str> = markets.keys().map(Symbol::as_str).collect();
        symbols.sort();
        assert_eq!(symbols, vec!["PM_BTC_15M_UP_NO_USDC", "PM_BTC_15M_UP_YES_USDC"]);
        assert!(markets.values().all(|m| m.exchange == ExchangeName::Polymarket));
    }

    #[tokio::test]
    async fn test_catalog_cached_across_config_changes() {
        let config = Arc::new(StaticConfig::new().with(ENV_MARKETS_JSON, r#"[{"symbol":"X"}]"#));
        let ex = adapter(config.clone());

        let first = ex.query_markets().await.unwrap();
        config.set(ENV_MARKETS_JSON, r#"[{"symbol":"Y"}]"#);
        let second = ex.query_markets().await.unwrap();

        assert_eq!(first, second);
        assert!(second.contains_key("X"));
        assert!(!second.contains_key("Y"));
    }

    #[tokio::test]
    async fn test_catalog_error_not_cached() {
        let config = Arc::new(StaticConfig::new().with(ENV_MARKETS_JSON, "garbage"));
        let ex = adapter(config.clone());

        assert!(matches!(ex.query_markets().await, Err(Error::Decode(_))));

        config.remove(ENV_MARKETS_JSON);
        assert_eq!(ex.query_markets().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_list_cancel() {
        let ex = adapter(Arc::new(StaticConfig::new()));

        let a = ex.submit_order(request("PM_BTC_15M_UP_YES_USDC")).await.unwrap();
        let b = ex.submit_order(request("PM_BTC_15M_UP_NO_USDC")).await.unwrap();
        assert_eq!((a.order_id, b.order_id), (1, 2));
        assert_eq!(a.exchange, ExchangeName::Polymarket);

        assert_eq!(ex.query_open_orders("").await.unwrap().len(), 2);
        assert_eq!(ex.query_open_orders("PM_BTC_15M_UP_YES_USDC").await.unwrap().len(), 1);

        ex.cancel_orders(&[a.clone()]).await.unwrap();
        let open = ex.query_open_orders("").await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].order_id, b.order_id);
        assert!(ex.query_open_orders("PM_BTC_15M_UP_YES_USDC").await.unwrap().is_empty());

        let canceled = ex.order(a.order_id).unwrap();
        assert_eq!(canceled.status, OrderStatus::Canceled);
        assert!(!canceled.is_working);
    }

    #[tokio::test]
    async fn test_cancel_unknown_order() {
        let ex = adapter(Arc::new(StaticConfig::new()));
        let a = ex.submit_order(request("A")).await.unwrap();

        let mut ghost = a.clone();
        ghost.order_id = 999;
        ex.cancel_orders(&[ghost]).await.unwrap();

        assert_eq!(ex.query_open_orders("").await.unwrap(), vec![a]);
        assert!(ex.order(999).is_none());
    }

    #[tokio::test]
    async fn test_live_mode_rejected() {
        let config = Arc::new(StaticConfig::new().with(ENV_DRY_RUN, "false"));
        let ex = adapter(config.clone());

        let err = ex.submit_order(request("A")).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(ex.query_open_orders("").await.unwrap().is_empty());

        // flag is re-read on each submission
        config.set(ENV_DRY_RUN, "true");
        assert_eq!(ex.submit_order(request("A")).await.unwrap().order_id, 1);
    }

    #[tokio::test]
    async fn test_live_mode_rejected_with_credentials() {
        let config = Arc::new(StaticConfig::new().with(ENV_DRY_RUN, "0"));
        let ex = Polymarket::with_source("key", "secret", "pass", config);
        assert!(ex.has_credentials());

        let err = ex.submit_order(request("A")).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(err.to_string().contains("credentials are configured but unused"));
        assert!(ex.order(1).is_none());

        assert!(!adapter(Arc::new(StaticConfig::new())).has_credentials());
        assert!(!Polymarket::with_source("key", " ", "pass", Arc::new(StaticConfig::new())).has_credentials());
    }

    #[tokio::test]
    async fn test_klines_unsupported() {
        let ex = adapter(Arc::new(StaticConfig::new()));
        let err = ex
            .query_klines("BTCUSDT", Interval::M15, KLineQueryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_account_and_tickers() {
        let config = Arc::new(StaticConfig::new().with(ENV_BALANCE_USDC, "100"));
        let ex = adapter(config);

        let balances = ex.query_account_balances().await.unwrap();
        assert_eq!(balances["USDC"].available, Decimal::from(100));
        assert_eq!(ex.default_fee_rates(), ExchangeFee::default());
        assert_eq!(ex.platform_fee_currency(), "USDC");

        let tickers = ex.query_tickers(&["A", "B"]).await.unwrap();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers["A"].last, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_get_unique_ids() {
        let ex = Arc::new(adapter(Arc::new(StaticConfig::new())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ex = ex.clone();
                tokio::spawn(async move {
                    let mut ids = Vec::new();
                    for _ in 0..25 {
                        ids.push(ex.submit_order(request("A")).await.unwrap().order_id);
                    }
                    ids
                })
            })
            .collect();

        let mut all = Vec::new();
        for h in handles {
            all.extend(h.await.unwrap());
        }
        all.sort_unstable();
        assert_eq!(all, (1..=200).collect::<Vec<u64>>());
    }
}
