//! Core types - Strong typing for the adapter contract

use std::borrow::Borrow;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Tradeable symbol (e.g., "PM_BTC_15M_UP_YES_USDC").
///
/// Unlike exchange tickers, catalog symbols are consumed verbatim, so no
/// case folding happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::new(s)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Venues known to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeName {
    Binance,
    #[default]
    Polymarket,
}

impl ExchangeName {
    pub const ALL: [ExchangeName; 2] = [ExchangeName::Binance, ExchangeName::Polymarket];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeName::Binance => "binance",
            ExchangeName::Polymarket => "polymarket",
        }
    }

    pub fn is_valid(&self) -> bool {
        Self::ALL.contains(self)
    }

    /// Favicon shown in notification footers
    pub fn footer_icon(&self) -> &'static str {
        match self {
            ExchangeName::Binance => "https://bin.bnbstatic.com/static/images/common/favicon.ico",
            ExchangeName::Polymarket => "https://polymarket.com/favicon.ico",
        }
    }
}

impl std::fmt::Display for ExchangeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown exchange name: {}", s)))
    }
}

/// Instrument definition as found in a market catalog.
///
/// Catalog files are written by hand, so `null` reads as the zero value and
/// any incoming `exchange` is ignored (the catalog loader stamps the venue).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Market {
    #[serde(skip_deserializing)]
    pub exchange: ExchangeName,
    #[serde(deserialize_with = "null_as_default")]
    pub symbol: Symbol,
    /// Venue-local identifier (reserved for the CLOB token id mapping)
    #[serde(deserialize_with = "null_as_default")]
    pub local_symbol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub base_currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quote_currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_precision: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_precision: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub quote_precision: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub tick_size: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub step_size: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub min_notional: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub min_quantity: Decimal,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub type MarketMap = HashMap<Symbol, Market>;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    LimitMaker,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::LimitMaker => write!(f, "LIMIT_MAKER"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    #[default]
    Gtc,
    Ioc,
    Fok,
}

/// Order status.
///
/// Only `New -> Canceled` exists; fills, rejects and expiry need new
/// transitions once a real CLOB connection lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Canceled,
}

impl OrderStatus {
    /// Venue-side textual status
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Canceled => "CANCELED",
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, OrderStatus::New)
    }
}

/// Order intent as sent by a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrder {
    pub symbol: Symbol,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Decimal,
    pub quantity: Decimal,
    #[serde(default)]
    pub time_in_force: TimeInForce,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SubmitOrder {
    pub fn limit(symbol: impl Into<Symbol>, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            price,
            quantity,
            time_in_force: TimeInForce::Gtc,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Order as tracked by the venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(flatten)]
    pub submit: SubmitOrder,
    pub exchange: ExchangeName,
    pub order_id: u64,
    pub status: OrderStatus,
    pub original_status: String,
    pub is_working: bool,
    pub executed_quantity: Decimal,
    pub creation_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl Order {
    pub fn symbol(&self) -> &Symbol {
        &self.submit.symbol
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ORDER {} #{} {} {} {} {} @ {} -> {}",
            self.exchange,
            self.order_id,
            self.submit.symbol,
            self.submit.order_type,
            self.submit.side,
            self.submit.quantity,
            self.submit.price,
            self.status.as_str(),
        )
    }
}

/// Ticker snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub last: Decimal,
    pub buy: Decimal,
    pub sell: Decimal,
    pub volume: Decimal,
}

impl Ticker {
    /// Ticker with only the timestamp populated
    pub fn empty_at(time: DateTime<Utc>) -> Self {
        Self {
            time,
            open: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            last: Decimal::ZERO,
            buy: Decimal::ZERO,
            sell: Decimal::ZERO,
            volume: Decimal::ZERO,
        }
    }
}

/// Candle interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KLine {
    pub exchange: ExchangeName,
    pub symbol: Symbol,
    pub interval: Interval,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub closed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct KLineQueryOptions {
    pub limit: Option<usize>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Account balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub available: Decimal,
    pub locked: Decimal,
}

impl Balance {
    pub fn total(&self) -> Decimal {
        self.available + self.locked
    }
}

pub type BalanceMap = HashMap<String, Balance>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExchangeFee {
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
}

/// Account view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    balances: BalanceMap,
    pub has_fee_rate: bool,
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_balances(&mut self, balances: BalanceMap) {
        self.balances.extend(balances);
    }

    pub fn balance(&self, currency: &str) -> Option<&Balance> {
        self.balances.get(currency)
    }

    pub fn balances(&self) -> &BalanceMap {
        &self.balances
    }

    pub fn into_balances(self) -> BalanceMap {
        self.balances
    }
}
