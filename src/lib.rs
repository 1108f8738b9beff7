//! Flash Arbitrage Bot - Cross-exchange opportunity evaluation and execution gating
//!
//! This bot aggregates prices for token pairs across multiple sources, computes
//! the minimum profitable spread for a flash-loan-funded trade, simulates the
//! trade before every execution attempt, and records outcomes into a persistent
//! per-pair learning memory with a circuit breaker.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod adapters;
pub mod aggregator;
pub mod fees;
pub mod gate;
pub mod simulator;
pub mod integrity;
pub mod scoring;
pub mod storage;
pub mod coordinator;
pub mod monitor;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::{BotError, BotResult};
pub use types::*;
