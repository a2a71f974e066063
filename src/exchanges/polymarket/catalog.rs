//! Market catalog - loads instrument definitions from configuration
//!
//! Two JSON shapes are accepted, tried in this order:
//! 1. `{"SYMBOL": {...}, ...}` keyed by symbol
//! 2. `[{...}, {...}]` keyed by each record's `symbol`

use rust_decimal::Decimal;
use tracing::info;

use crate::core::{ConfigSource, Error, ExchangeName, Market, MarketMap, Result, Symbol};

use super::{ENV_MARKETS_FILE, ENV_MARKETS_JSON};

/// Load the catalog from `POLYMARKET_MARKETS_FILE` or
/// `POLYMARKET_MARKETS_JSON`. An empty map means nothing is configured.
pub fn load_catalog(config: &dyn ConfigSource) -> Result<MarketMap> {
    if let Some(path) = config.get_trimmed(ENV_MARKETS_FILE) {
        let raw = std::fs::read(&path).map_err(|source| Error::Io {
            key: ENV_MARKETS_FILE,
            source,
        })?;
        let markets = decode_markets(&raw)?;
        info!(path = %path, count = markets.len(), "Loaded polymarket markets from file");
        return Ok(markets);
    }

    if let Some(raw) = config.get_trimmed(ENV_MARKETS_JSON) {
        let markets = decode_markets(raw.as_bytes())?;
        info!(count = markets.len(), "Loaded polymarket markets from inline json");
        return Ok(markets);
    }

    Ok(MarketMap::new())
}

/// Decode either accepted shape. A non-empty symbol-keyed object wins;
/// otherwise the payload must be an array of records.
///
/// When neither shape fits, the error names both attempts.
pub fn decode_markets(raw: &[u8]) -> Result<MarketMap> {
    let map_err = match serde_json::from_slice::<MarketMap>(raw) {
        Ok(map) if !map.is_empty() => return Ok(map),
        Ok(_) => None,
        Err(e) => Some(e),
    };

    let records: Vec<Market> = serde_json::from_slice(raw).map_err(|arr_err| match &map_err {
        Some(map_err) => Error::Decode(format!(
            "as symbol map: {}; as market list: {}",
            map_err, arr_err
        )),
        None => Error::Decode(arr_err.to_string()),
    })?;
    from_records(records)
}

/// Key a list of records by symbol; every record needs one.
pub fn from_records(records: Vec<Market>) -> Result<MarketMap> {
    let mut out = MarketMap::with_capacity(records.len());
    for (idx, market) in records.into_iter().enumerate() {
        if market.symbol.is_empty() {
            return Err(Error::Decode(format!(
                "market symbol is empty in json (record {})",
                idx
            )));
        }
        out.insert(market.symbol.clone(), market);
    }
    Ok(out)
}

/// Stamp the venue and backfill blank symbols from their map key.
pub fn normalize(markets: &mut MarketMap) {
    for (symbol, market) in markets.iter_mut() {
        market.exchange = ExchangeName::Polymarket;
        if market.symbol.is_empty() {
            market.symbol = symbol.clone();
        }
    }
}

/// Built-in catalog for the BTC 15m up/down example.
///
/// `local_symbol` stands in for the CLOB token id until the real mapping
/// is wired up.
pub fn default_markets() -> MarketMap {
    [
        ("PM_BTC_15M_UP_YES_USDC", "PM_BTC_15M_UP_YES"),
        ("PM_BTC_15M_UP_NO_USDC", "PM_BTC_15M_UP_NO"),
    ]
    .into_iter()
    .map(|(symbol, base)| {
        let market = Market {
            exchange: ExchangeName::Polymarket,
            symbol: Symbol::new(symbol),
            local_symbol: symbol.to_string(),
            base_currency: base.to_string(),
            quote_currency: "USDC".to_string(),
            price_precision: 4,
            volume_precision: 2,
            quote_precision: 2,
            // probability prices live in 0..1
            tick_size: Decimal::new(1, 4),
            step_size: Decimal::new(1, 2),
            min_notional: Decimal::ONE,
            min_quantity: Decimal::ONE,
        };
        (Symbol::new(symbol), market)
    })
    .collect()
}
