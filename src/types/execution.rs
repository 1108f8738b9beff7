//! Execution attempt and adapter contract types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::SimulationResult;

/// Terminal state of one coordinator run.
///
/// Only `Success` and `Failed` mean an execution was actually attempted;
/// the other states terminate before EXECUTE and never touch the
/// win/loss statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttemptState {
    Skipped,
    RejectedSpread,
    RejectedSimulation,
    RejectedSafety,
    Success,
    Failed,
}

impl AttemptState {
    pub fn execution_attempted(self) -> bool {
        matches!(self, AttemptState::Success | AttemptState::Failed)
    }
}

/// Transient audit record tying one cycle's evaluation together.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionAttempt {
    pub id: String,
    pub pair: String,
    pub amount_eth: Decimal,
    pub state: AttemptState,
    pub observed_spread_pct: Option<Decimal>,
    /// Required spread as a percentage; recorded together with the observed
    /// spread so gate rejections keep a near-miss trail.
    pub required_spread_pct: Option<Decimal>,
    pub simulation: Option<SimulationResult>,
    pub safety_reason: Option<String>,
    pub tx_id: Option<String>,
    pub realized_profit_usd: Option<Decimal>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_in_ms: u64,
}

/// Parameters handed to the execution adapter for submission.
#[derive(Debug, Clone, Serialize)]
pub struct TradeParams {
    pub pair: String,
    pub amount_eth: Decimal,
    pub buy_source: String,
    pub sell_source: String,
    pub flash_loan_provider: String,
    pub expected_net_profit_usd: Decimal,
    pub max_gas_price_gwei: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReceipt {
    pub success: bool,
    pub tx_id: String,
    pub gas_used: u64,
    pub realized_profit_usd: Decimal,
    pub detail: String,
}
