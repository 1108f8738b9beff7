//! Execution coordinator
//!
//! Drives one pair through the full pipeline: loss-streak skip check,
//! flash-loan fee selection, spread gate, simulation, safety pre-flight,
//! then submission and confirmation. Per-pair attempts are exclusive and
//! a semaphore caps concurrent executions across pairs.
//!
//! Win/loss statistics are touched only when an execution was actually
//! submitted; every earlier rejection leaves the scoring memory alone but
//! still lands in the audit trail.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tracing::{info, warn};

use crate::adapters::{ExecutionAdapter, GasOracle};
use crate::aggregator::PriceAggregator;
use crate::config::{Config, MAX_PENDING_TX};
use crate::fees::FeeOptimizer;
use crate::gate::{clears_gate, gas_cost_percent, minimum_spread};
use crate::scoring::ScoringMemory;
use crate::simulator::TradeSimulator;
use crate::storage;
use crate::types::{AttemptState, ExecutionAttempt, TradeParams};

pub struct ExecutionCoordinator {
    config: Config,
    aggregator: Arc<PriceAggregator>,
    fee_optimizer: Arc<FeeOptimizer>,
    gas_oracle: Arc<dyn GasOracle>,
    simulator: Arc<TradeSimulator>,
    scoring: Arc<ScoringMemory>,
    executor: Arc<dyn ExecutionAdapter>,
    in_flight: Mutex<HashSet<String>>,
    execution_slots: Semaphore,
}

impl ExecutionCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        aggregator: Arc<PriceAggregator>,
        fee_optimizer: Arc<FeeOptimizer>,
        gas_oracle: Arc<dyn GasOracle>,
        simulator: Arc<TradeSimulator>,
        scoring: Arc<ScoringMemory>,
        executor: Arc<dyn ExecutionAdapter>,
    ) -> Self {
        let slots = config.max_concurrent_executions;
        Self {
            config,
            aggregator,
            fee_optimizer,
            gas_oracle,
            simulator,
            scoring,
            executor,
            in_flight: Mutex::new(HashSet::new()),
            execution_slots: Semaphore::new(slots),
        }
    }

    /// Runs one full attempt for a pair and returns the audit record.
    ///
    /// Never fails wholesale: every internal error is folded into the
    /// attempt's terminal state. The record is appended to the audit trail
    /// best-effort.
    pub async fn run_attempt(&self, pair: &str) -> ExecutionAttempt {
        let started = Instant::now();

        if !self.mark_in_flight(pair).await {
            let mut attempt = self.new_attempt(pair);
            attempt.state = AttemptState::Skipped;
            attempt.safety_reason = Some("attempt already in flight".to_string());
            return attempt;
        }

        let mut attempt = self.evaluate(pair).await;
        self.in_flight.lock().await.remove(pair);

        attempt.completed_in_ms = started.elapsed().as_millis() as u64;
        if let Err(e) = storage::save_attempt(&attempt) {
            warn!("Failed to persist attempt {}: {}", attempt.id, e);
        }

        attempt
    }

    async fn mark_in_flight(&self, pair: &str) -> bool {
        self.in_flight.lock().await.insert(pair.to_string())
    }

    fn new_attempt(&self, pair: &str) -> ExecutionAttempt {
        ExecutionAttempt {
            id: uuid::Uuid::new_v4().to_string(),
            pair: pair.to_string(),
            amount_eth: self.config.trade_size_eth,
            state: AttemptState::Skipped,
            observed_spread_pct: None,
            required_spread_pct: None,
            simulation: None,
            safety_reason: None,
            tx_id: None,
            realized_profit_usd: None,
            error: None,
            started_at: chrono::Utc::now(),
            completed_in_ms: 0,
        }
    }

    async fn evaluate(&self, pair: &str) -> ExecutionAttempt {
        let mut attempt = self.new_attempt(pair);
        let amount = self.config.trade_size_eth;

        if self.scoring.should_skip(pair).await {
            info!("⏭️ Skipping {} on an unbroken loss streak", pair);
            attempt.state = AttemptState::Skipped;
            attempt.safety_reason = Some("loss streak exhausted".to_string());
            return attempt;
        }

        // Cheapest capable flash-loan provider for this notional.
        let loan = match self.fee_optimizer.get_optimal_provider(amount).await {
            Ok(loan) => loan,
            Err(e) => {
                attempt.state = AttemptState::RejectedSpread;
                attempt.error = Some(e.to_string());
                return attempt;
            }
        };

        let gas_price_gwei = self.gas_oracle.current_gas_price_gwei().await;

        let snapshot = self.aggregator.get_spread(pair, amount).await;
        if !snapshot.has_data() {
            attempt.state = AttemptState::RejectedSpread;
            attempt.error = Some(format!(
                "insufficient data: {} quote(s) for {}",
                snapshot.quotes.len(),
                pair
            ));
            return attempt;
        }

        let gas_pct = gas_cost_percent(gas_price_gwei, self.config.estimated_gas_units(), amount);
        let required = minimum_spread(loan.fee_rate, gas_pct, self.config.safety_buffer);
        attempt.observed_spread_pct = Some(snapshot.spread_pct);
        attempt.required_spread_pct = Some(required * dec!(100));

        let forced = self.config.force_execute
            && self.config.force_execute_zero_fee_only
            && loan.fee_rate == dec!(0);
        if !clears_gate(snapshot.spread_pct, required) {
            if forced {
                warn!(
                    "⚠️ Zero-fee forced override: {} spread {}% below required {}%",
                    pair,
                    snapshot.spread_pct.round_dp(3),
                    (required * dec!(100)).round_dp(3)
                );
            } else {
                // Near miss stays on record: observed vs required.
                attempt.state = AttemptState::RejectedSpread;
                return attempt;
            }
        }

        let simulation = self
            .simulator
            .simulate(pair, amount, gas_price_gwei, loan.fee_rate)
            .await;
        let valid = simulation.valid;
        let expected_net = simulation.net_profit_usd;
        let buy_source = simulation.breakdown.buy_source.clone();
        let sell_source = simulation.breakdown.sell_source.clone();
        attempt.simulation = Some(simulation);

        if !valid {
            attempt.state = AttemptState::RejectedSimulation;
            return attempt;
        }

        if let Err(reason) = self.safety_preflight(gas_price_gwei).await {
            attempt.state = AttemptState::RejectedSafety;
            attempt.safety_reason = Some(reason);
            return attempt;
        }

        let permit = match self.execution_slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                attempt.state = AttemptState::RejectedSafety;
                attempt.safety_reason = Some("execution slots closed".to_string());
                return attempt;
            }
        };

        let params = TradeParams {
            pair: pair.to_string(),
            amount_eth: amount,
            buy_source,
            sell_source,
            flash_loan_provider: loan.provider.clone(),
            expected_net_profit_usd: expected_net,
            max_gas_price_gwei: self.config.max_gas_price_gwei,
        };

        info!(
            "🚀 Executing {}: buy {} / sell {} via {}, expected net {} USD",
            pair,
            params.buy_source,
            params.sell_source,
            params.flash_loan_provider,
            expected_net.round_dp(2)
        );

        let tx_id = match self.executor.submit(&params).await {
            Ok(tx_id) => tx_id,
            Err(e) => {
                drop(permit);
                attempt.state = AttemptState::Failed;
                attempt.error = Some(e.to_string());
                self.record_outcome(pair, false, dec!(0)).await;
                return attempt;
            }
        };
        attempt.tx_id = Some(tx_id.clone());

        let timeout = Duration::from_secs(self.config.execution_timeout_secs);
        let confirmation =
            tokio::time::timeout(timeout, self.executor.await_confirmation(&tx_id, timeout)).await;
        drop(permit);

        match confirmation {
            Ok(Ok(receipt)) => {
                attempt.realized_profit_usd = Some(receipt.realized_profit_usd);
                if receipt.success {
                    attempt.state = AttemptState::Success;
                    info!(
                        "✅ {} confirmed {}: realized {} USD",
                        pair,
                        receipt.tx_id,
                        receipt.realized_profit_usd.round_dp(2)
                    );
                } else {
                    attempt.state = AttemptState::Failed;
                    attempt.error = Some(receipt.detail.clone());
                    warn!("❌ {} reverted {}: {}", pair, receipt.tx_id, receipt.detail);
                }
                self.record_outcome(pair, receipt.success, receipt.realized_profit_usd)
                    .await;
            }
            Ok(Err(e)) => {
                attempt.state = AttemptState::Failed;
                attempt.error = Some(e.to_string());
                self.record_outcome(pair, false, dec!(0)).await;
            }
            Err(_) => {
                attempt.state = AttemptState::Failed;
                attempt.error = Some(format!("no confirmation within {:?}", timeout));
                self.record_outcome(pair, false, dec!(0)).await;
            }
        }

        attempt
    }

    /// Last-line checks between a valid simulation and submission.
    async fn safety_preflight(&self, gas_price_gwei: Decimal) -> Result<(), String> {
        if gas_price_gwei > Decimal::from(self.config.max_gas_price_gwei) {
            return Err(format!(
                "gas price {} gwei above cap {}",
                gas_price_gwei, self.config.max_gas_price_gwei
            ));
        }

        // Gas cost over a 1 ETH notional is the absolute ETH cost.
        let worst_case_gas_eth =
            gas_cost_percent(gas_price_gwei, self.config.estimated_gas_units(), dec!(1));
        match self.executor.wallet_balance_eth().await {
            Ok(balance) if balance < worst_case_gas_eth => {
                return Err(format!(
                    "wallet balance {} ETH below worst-case gas {} ETH",
                    balance, worst_case_gas_eth
                ));
            }
            Ok(_) => {}
            Err(e) => return Err(format!("wallet balance unavailable: {}", e)),
        }

        match self.executor.contract_code_present().await {
            Ok(true) => {}
            Ok(false) => return Err("arbitrage contract code missing".to_string()),
            Err(e) => return Err(format!("contract code check failed: {}", e)),
        }

        match self.executor.pending_tx_count().await {
            Ok(pending) if pending > MAX_PENDING_TX => {
                return Err(format!(
                    "{} pending transactions above limit {}",
                    pending, MAX_PENDING_TX
                ));
            }
            Ok(_) => {}
            Err(e) => return Err(format!("pending transaction count failed: {}", e)),
        }

        Ok(())
    }

    async fn record_outcome(&self, pair: &str, success: bool, realized_usd: Decimal) {
        if let Err(e) = self.scoring.record_outcome(pair, success, realized_usd).await {
            warn!("Failed to persist outcome for {}: {}", pair, e);
        }
    }
}
