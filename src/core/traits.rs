//! Core traits - The contract the host trading pipeline drives

use async_trait::async_trait;
use std::collections::HashMap;

use crate::core::{Result, types::*};

/// Exchange trait - everything a host session needs from a venue
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Venue identity
    fn name(&self) -> ExchangeName;

    /// Currency fees are settled in
    fn platform_fee_currency(&self) -> &str;

    /// Fee rates assumed when the account does not report any
    fn default_fee_rates(&self) -> ExchangeFee;

    /// Market data stream for this venue
    fn new_stream(&self) -> Box<dyn MarketStream>;

    async fn query_markets(&self) -> Result<MarketMap>;

    async fn query_ticker(&self, symbol: &str) -> Result<Ticker>;

    async fn query_tickers(&self, symbols: &[&str]) -> Result<HashMap<String, Ticker>>;

    async fn query_klines(
        &self,
        symbol: &str,
        interval: Interval,
        options: KLineQueryOptions,
    ) -> Result<Vec<KLine>>;

    async fn query_account(&self) -> Result<Account>;

    async fn query_account_balances(&self) -> Result<BalanceMap>;

    async fn submit_order(&self, order: SubmitOrder) -> Result<Order>;

    /// Working orders, optionally restricted to one symbol (empty = all)
    async fn query_open_orders(&self, symbol: &str) -> Result<Vec<Order>>;

    async fn cancel_orders(&self, orders: &[Order]) -> Result<()>;
}

/// Connection lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    Connected,
    Started,
    Disconnected,
}

/// Market data stream trait
#[async_trait]
pub trait MarketStream: Send + Sync {
    async fn connect(&self) -> Result<()>;

    async fn close(&self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Receive lifecycle events emitted after this call
    fn subscribe(&self) -> flume::Receiver<StreamEvent>;
}
