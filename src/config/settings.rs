//! Bot configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// Configuration constants
pub const MIN_TRADE_SIZE_ETH: Decimal = dec!(0.01);
pub const MAX_TRADE_SIZE_ETH: Decimal = dec!(10.0);
pub const DEFAULT_SAFETY_BUFFER: Decimal = dec!(0.02);
pub const MIN_MONITORING_INTERVAL_MS: u64 = 1_000;
pub const QUOTE_CACHE_TTL_SECS: u64 = 10;
pub const QUOTE_TIMEOUT_MS: u64 = 2_000;

// Gas cost model. The flash-loan overhead covers loan initiation, two swaps
// and repayment on top of the base arbitrage call.
pub const BASE_GAS_UNITS: u64 = 250_000;
pub const FLASH_LOAN_GAS_OVERHEAD: u64 = 100_000;
pub const DEFAULT_GAS_PRICE_GWEI: u32 = 50;
pub const MAX_GAS_PRICE_GWEI: u32 = 200;

// Execution constants
pub const EXECUTION_TIMEOUT_SECS: u64 = 30;
pub const MAX_PENDING_TX: u32 = 5;
pub const RISK_ACCEPTANCE_THRESHOLD: Decimal = dec!(70);
pub const SCORE_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub monitored_pairs: Vec<String>,
    pub trade_size_eth: Decimal,
    pub monitoring_interval_ms: u64,
    pub safety_buffer: Decimal,
    pub min_success_rate: Decimal,
    pub max_failed_attempts: u32,
    pub max_gas_price_gwei: u32,
    pub risk_threshold: Decimal,
    pub max_concurrent_executions: usize,
    pub execution_timeout_secs: u64,
    pub quote_cache_ttl_secs: u64,
    pub quote_timeout_ms: u64,
    pub score_retention_days: i64,
    pub score_file: String,
    pub max_consecutive_errors: u32,
    pub circuit_breaker_cooldown_secs: u64,
    pub integrity_recheck_cycles: Option<u64>,
    // Price source endpoints, "Name=url" with {SYMBOL} substituted per pair
    pub price_sources: Vec<(String, String)>,
    pub gas_oracle_url: Option<String>,
    pub gas_oracle_api_key: Option<String>,
    // Integrity-sensitive execution flags
    pub bypass_simulation: bool,
    pub queued_execution: bool,
    pub standing_approvals: Vec<String>,
    pub force_execute: bool,
    pub force_execute_zero_fee_only: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            monitored_pairs: env::var("MONITORED_PAIRS")
                .unwrap_or_else(|_| "ETH/USDC,ETH/USDT".to_string())
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            trade_size_eth: env::var("TRADE_SIZE_ETH")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1.0))
                .max(MIN_TRADE_SIZE_ETH)
                .min(MAX_TRADE_SIZE_ETH),
            monitoring_interval_ms: env::var("MONITORING_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(12_000)
                .max(MIN_MONITORING_INTERVAL_MS),
            safety_buffer: env::var("SAFETY_BUFFER")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(DEFAULT_SAFETY_BUFFER)
                .max(dec!(0)),
            min_success_rate: env::var("MIN_SUCCESS_RATE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(0.95)),
            max_failed_attempts: env::var("MAX_FAILED_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5)
                .max(1),
            max_gas_price_gwei: env::var("MAX_GAS_PRICE_GWEI")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_GAS_PRICE_GWEI)
                .min(MAX_GAS_PRICE_GWEI),
            risk_threshold: env::var("RISK_THRESHOLD")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(RISK_ACCEPTANCE_THRESHOLD)
                .min(dec!(100)),
            max_concurrent_executions: env::var("MAX_CONCURRENT_EXECUTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2)
                .max(1),
            execution_timeout_secs: env::var("EXECUTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(EXECUTION_TIMEOUT_SECS),
            quote_cache_ttl_secs: env::var("QUOTE_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(QUOTE_CACHE_TTL_SECS),
            quote_timeout_ms: env::var("QUOTE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(QUOTE_TIMEOUT_MS),
            score_retention_days: env::var("SCORE_RETENTION_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SCORE_RETENTION_DAYS),
            score_file: env::var("SCORE_FILE")
                .unwrap_or_else(|_| "output/memory/pair_scores.json".to_string()),
            max_consecutive_errors: 5,
            circuit_breaker_cooldown_secs: 300, // 5 minutes
            integrity_recheck_cycles: env::var("INTEGRITY_RECHECK_CYCLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0),
            price_sources: env::var("PRICE_SOURCES")
                .unwrap_or_else(|_| default_price_sources())
                .split(',')
                .filter_map(|entry| {
                    entry
                        .split_once('=')
                        .map(|(name, url)| (name.trim().to_string(), url.trim().to_string()))
                })
                .collect(),
            gas_oracle_url: env::var("GAS_ORACLE_URL").ok(),
            gas_oracle_api_key: env::var("GAS_ORACLE_API_KEY").ok(),
            bypass_simulation: parse_bool_env("BYPASS_SIMULATION", false),
            queued_execution: parse_bool_env("QUEUED_EXECUTION", false),
            standing_approvals: env::var("STANDING_APPROVALS")
                .unwrap_or_default()
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            force_execute: parse_bool_env("FORCE_EXECUTE", false),
            force_execute_zero_fee_only: parse_bool_env("FORCE_EXECUTE_ZERO_FEE_ONLY", true),
        }
    }

    pub fn estimated_gas_units(&self) -> u64 {
        BASE_GAS_UNITS + FLASH_LOAN_GAS_OVERHEAD
    }
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn default_price_sources() -> String {
    [
        "Binance=https://api.binance.com/api/v3/ticker/price?symbol={SYMBOL}",
        "MEXC=https://api.mexc.com/api/v3/ticker/price?symbol={SYMBOL}",
    ]
    .join(",")
}
