//! Continuous monitoring loop
//!
//! Runs the coordinator over every monitored pair on a fixed interval.
//! Startup is refused outright when the integrity check reports a
//! critical violation. Per-pair failures are isolated; only cycles where
//! every pair errors feed the loop-level circuit breaker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::coordinator::ExecutionCoordinator;
use crate::errors::{BotError, BotResult, CircuitBreaker};
use crate::integrity::IntegrityGuard;
use crate::scoring::ScoringMemory;
use crate::storage;
use crate::utils;

const STATS_EVERY_CYCLES: u64 = 10;

#[derive(Default)]
struct SessionStats {
    cycles: u64,
    attempts: u64,
    executions: u64,
    successful_executions: u64,
    error_counts: HashMap<String, u32>,
}

pub struct MonitoringLoop {
    config: Config,
    coordinator: Arc<ExecutionCoordinator>,
    scoring: Arc<ScoringMemory>,
    circuit_breaker: Arc<CircuitBreaker>,
    stop: Arc<AtomicBool>,
}

impl MonitoringLoop {
    pub fn new(
        config: Config,
        coordinator: Arc<ExecutionCoordinator>,
        scoring: Arc<ScoringMemory>,
    ) -> Self {
        let circuit_breaker = Arc::new(CircuitBreaker::new(
            config.max_consecutive_errors,
            config.circuit_breaker_cooldown_secs,
        ));
        Self {
            config,
            coordinator,
            scoring,
            circuit_breaker,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag shared with the shutdown handler; setting it ends the loop
    /// after the in-progress pair finishes.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub async fn run(&self) -> BotResult<()> {
        self.verify_integrity()?;

        if let Err(e) = self.scoring.prune_stale(self.config.score_retention_days).await {
            warn!("Stale-score pruning failed: {}", e);
        }

        let start_time = Instant::now();
        let mut stats = SessionStats::default();
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.monitoring_interval_ms));

        info!(
            "🚀 Monitoring {} pair(s) every {}ms",
            self.config.monitored_pairs.len(),
            self.config.monitoring_interval_ms
        );

        while !self.stop.load(Ordering::Relaxed) {
            interval.tick().await;
            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            if !self.circuit_breaker.can_proceed().await {
                warn!("⚡ Circuit breaker is OPEN, waiting for cooldown...");
                continue;
            }

            self.run_cycle(&mut stats).await;
            stats.cycles += 1;

            if let Some(every) = self.config.integrity_recheck_cycles {
                if stats.cycles % every == 0 {
                    if let Err(e) = self.verify_integrity() {
                        error!("Integrity recheck failed mid-session, stopping");
                        return Err(e);
                    }
                }
            }

            if stats.cycles % STATS_EVERY_CYCLES == 0 {
                utils::print_session_stats(
                    start_time,
                    stats.cycles,
                    stats.attempts,
                    stats.executions,
                    stats.successful_executions,
                    &self.scoring.summary().await,
                    &stats.error_counts,
                    &self.circuit_breaker,
                )
                .await;
            }
        }

        utils::print_final_stats(start_time, &self.scoring.summary().await);
        Ok(())
    }

    async fn run_cycle(&self, stats: &mut SessionStats) {
        let mut pair_errors = 0usize;

        for pair in &self.config.monitored_pairs {
            if self.stop.load(Ordering::Relaxed) {
                return;
            }

            let attempt = self.coordinator.run_attempt(pair).await;
            stats.attempts += 1;
            if attempt.state.execution_attempted() {
                stats.executions += 1;
                if attempt.state == crate::types::AttemptState::Success {
                    stats.successful_executions += 1;
                }
            }
            if attempt.error.is_some() {
                pair_errors += 1;
                *stats.error_counts.entry(pair.clone()).or_insert(0) += 1;
            }

            utils::print_attempt(&attempt);
        }

        // Only a fully failed cycle counts against the breaker.
        let pairs = self.config.monitored_pairs.len();
        if pairs > 0 && pair_errors == pairs {
            if self.circuit_breaker.record_error().await {
                error!("Circuit breaker activated: every pair errored this cycle");
            }
        } else {
            self.circuit_breaker.record_success().await;
        }
    }

    fn verify_integrity(&self) -> BotResult<()> {
        let report = IntegrityGuard::check(&self.config);
        utils::print_integrity_report(&report);
        if let Err(e) = storage::save_integrity_report(&report) {
            warn!("Failed to persist integrity report: {}", e);
        }

        if report.is_critical() {
            return Err(BotError::IntegrityViolation {
                violations: report.violations.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedFeeProvider, SimulatedExecutionAdapter};
    use crate::aggregator::PriceAggregator;
    use crate::fees::FeeOptimizer;
    use crate::simulator::TradeSimulator;
    use crate::storage::JsonFileScoreStore;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct StaticGas;

    #[async_trait]
    impl crate::adapters::GasOracle for StaticGas {
        async fn current_gas_price_gwei(&self) -> Decimal {
            dec!(4)
        }
    }

    fn test_config(dir: &tempfile::TempDir) -> Config {
        Config {
            monitored_pairs: Vec::new(),
            trade_size_eth: dec!(1),
            monitoring_interval_ms: 1_000,
            safety_buffer: dec!(0.02),
            min_success_rate: dec!(0.95),
            max_failed_attempts: 5,
            max_gas_price_gwei: 200,
            risk_threshold: dec!(70),
            max_concurrent_executions: 2,
            execution_timeout_secs: 30,
            quote_cache_ttl_secs: 10,
            quote_timeout_ms: 2_000,
            score_retention_days: 30,
            score_file: dir
                .path()
                .join("scores.json")
                .to_string_lossy()
                .into_owned(),
            max_consecutive_errors: 5,
            circuit_breaker_cooldown_secs: 300,
            integrity_recheck_cycles: None,
            price_sources: Vec::new(),
            gas_oracle_url: None,
            gas_oracle_api_key: None,
            bypass_simulation: false,
            queued_execution: false,
            standing_approvals: Vec::new(),
            force_execute: false,
            force_execute_zero_fee_only: true,
        }
    }

    async fn monitoring_loop(config: Config) -> MonitoringLoop {
        let aggregator = Arc::new(PriceAggregator::new(
            Vec::new(),
            Duration::from_secs(10),
            Duration::from_millis(100),
        ));
        let simulator = Arc::new(TradeSimulator::new(
            Arc::clone(&aggregator),
            config.risk_threshold,
            config.estimated_gas_units(),
        ));
        let store = Arc::new(JsonFileScoreStore::new(&config.score_file));
        let scoring = Arc::new(
            ScoringMemory::load(store, config.max_failed_attempts)
                .await
                .unwrap(),
        );
        let coordinator = Arc::new(ExecutionCoordinator::new(
            config.clone(),
            aggregator,
            Arc::new(FeeOptimizer::new(FixedFeeProvider::default_set())),
            Arc::new(StaticGas),
            simulator,
            Arc::clone(&scoring),
            Arc::new(SimulatedExecutionAdapter::new(dec!(5))),
        ));
        MonitoringLoop::new(config, coordinator, scoring)
    }

    #[tokio::test]
    async fn refuses_to_start_on_a_critical_violation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.bypass_simulation = true;

        let result = monitoring_loop(config).await.run().await;
        assert!(matches!(
            result,
            Err(BotError::IntegrityViolation { violations: 1 })
        ));
    }

    #[tokio::test]
    async fn pre_stopped_loop_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let looper = monitoring_loop(test_config(&dir)).await;

        looper.stop_handle().store(true, Ordering::Relaxed);
        looper.run().await.unwrap();
    }
}
