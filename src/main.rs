use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use aleph_polymarket::core::{Exchange, MarketStream};
use aleph_polymarket::feeds::BinanceKLineFeed;
use aleph_polymarket::strategies::UpDownStrategy;
use aleph_polymarket::{AppConfig, Polymarket};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aleph_polymarket=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    tracing::info!("🦀 AlephTX Polymarket adapter starting...");

    let config = AppConfig::load_default();

    let polymarket = Arc::new(Polymarket::new(
        std::env::var("POLYMARKET_API_KEY").unwrap_or_default(),
        std::env::var("POLYMARKET_API_SECRET").unwrap_or_default(),
        std::env::var("POLYMARKET_API_PASSPHRASE").unwrap_or_default(),
    ));

    let markets = polymarket.query_markets().await?;
    for market in markets.values() {
        tracing::info!(
            symbol = %market.symbol,
            base = %market.base_currency,
            quote = %market.quote_currency,
            tick = %market.tick_size,
            "📈 Market loaded"
        );
    }

    let balances = polymarket.query_account_balances().await?;
    tracing::info!("💰 Balances: {:?}", balances);

    let stream = polymarket.new_stream();
    stream.connect().await?;

    let strategy = UpDownStrategy::new(config.updown.clone())?;
    let feed = BinanceKLineFeed::new(config.feed.binance_url.clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let exchange = polymarket.clone();
    let handle = tokio::spawn(async move {
        strategy.run(&feed, exchange.as_ref(), shutdown_rx).await
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("🛑 Shutting down...");
    shutdown_tx.send(true).ok();

    handle.await??;
    stream.close().await?;

    let open = polymarket.query_open_orders("").await?;
    tracing::info!("✅ Stopped with {} open dry-run orders", open.len());

    Ok(())
}
