//! Flash Arbitrage Bot - Main Entry Point
//!
//! Wires the price sources, flash-loan providers, gas oracle and scoring
//! memory together and runs the monitoring loop until Ctrl+C.

use anyhow::Result;
use dex_flash_arb_bot::*;
use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::{
    FixedFeeProvider, HttpGasOracle, PriceSource, SimulatedExecutionAdapter, TickerPriceSource,
};
use crate::aggregator::PriceAggregator;
use crate::coordinator::ExecutionCoordinator;
use crate::fees::FeeOptimizer;
use crate::monitor::MonitoringLoop;
use crate::scoring::ScoringMemory;
use crate::simulator::TradeSimulator;
use crate::storage::JsonFileScoreStore;

// Ticker endpoints expose no order-book depth; a conservative per-source
// depth estimate feeds the slippage model.
const ASSUMED_SOURCE_LIQUIDITY_ETH: rust_decimal::Decimal = dec!(5000);
const TICKER_TAKER_FEE_RATE: rust_decimal::Decimal = dec!(0.001);
const SIMULATED_WALLET_BALANCE_ETH: rust_decimal::Decimal = dec!(5);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    let config = Config::load();

    info!("⚡ Flash Arbitrage Bot v0.3.0 - Opportunity Evaluation & Execution Gating");
    info!("📋 Configuration:");
    info!("   Pairs: {}", config.monitored_pairs.join(", "));
    info!("   Trade Size: {} ETH", config.trade_size_eth);
    info!("   Safety Buffer: {}", config.safety_buffer);
    info!("   Risk Threshold: {}", config.risk_threshold);
    info!("   Max Gas Price: {} gwei", config.max_gas_price_gwei);
    info!("   Interval: {}ms", config.monitoring_interval_ms);
    info!("   ⚠️  SIMULATED EXECUTION - No real funds at risk");

    if config.monitored_pairs.is_empty() {
        return Err(anyhow::anyhow!("No pairs configured in MONITORED_PAIRS"));
    }
    if config.trade_size_eth < config::MIN_TRADE_SIZE_ETH
        || config.trade_size_eth > config::MAX_TRADE_SIZE_ETH
    {
        return Err(anyhow::anyhow!(
            "Trade size out of bounds: {} ETH",
            config.trade_size_eth
        ));
    }

    // Price sources from config, skipping any that fail to initialize.
    let mut sources: Vec<Arc<dyn PriceSource>> = Vec::new();
    for (name, url) in &config.price_sources {
        match TickerPriceSource::new(
            name.clone(),
            url.clone(),
            TICKER_TAKER_FEE_RATE,
            ASSUMED_SOURCE_LIQUIDITY_ETH,
            Duration::from_millis(config.quote_timeout_ms),
        ) {
            Ok(source) => sources.push(Arc::new(source)),
            Err(e) => warn!("Skipping price source {}: {}", name, e),
        }
    }
    if sources.len() < 2 {
        return Err(anyhow::anyhow!(
            "Need at least 2 usable price sources, have {}",
            sources.len()
        ));
    }
    info!("✅ Initialized {} price source(s)", sources.len());

    let aggregator = Arc::new(PriceAggregator::new(
        sources,
        Duration::from_secs(config.quote_cache_ttl_secs),
        Duration::from_millis(config.quote_timeout_ms),
    ));
    let fee_optimizer = Arc::new(FeeOptimizer::new(FixedFeeProvider::default_set()));
    let gas_oracle = Arc::new(HttpGasOracle::new(
        config.gas_oracle_url.clone(),
        config.gas_oracle_api_key.clone(),
    ));
    let simulator = Arc::new(TradeSimulator::new(
        Arc::clone(&aggregator),
        config.risk_threshold,
        config.estimated_gas_units(),
    ));

    let store = Arc::new(JsonFileScoreStore::new(&config.score_file));
    let scoring = Arc::new(ScoringMemory::load(store, config.max_failed_attempts).await?);

    let coordinator = Arc::new(ExecutionCoordinator::new(
        config.clone(),
        aggregator,
        fee_optimizer,
        gas_oracle,
        simulator,
        Arc::clone(&scoring),
        Arc::new(SimulatedExecutionAdapter::new(SIMULATED_WALLET_BALANCE_ETH)),
    ));

    let monitoring = MonitoringLoop::new(config, coordinator, scoring);
    let stop = monitoring.stop_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("\n📛 Received shutdown signal (Ctrl+C)...");
            stop.store(true, Ordering::Relaxed);
        }
    });

    monitoring.run().await?;

    info!("👋 Shutdown complete");
    Ok(())
}
