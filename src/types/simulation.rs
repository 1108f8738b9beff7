//! Trade simulation result types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of simulating a candidate flash-loan arbitrage trade.
///
/// `valid` holds only when net profit is positive and the risk score is
/// below the acceptance threshold. All monetary fields are in the quote
/// currency (USD).
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub valid: bool,
    pub gross_profit_usd: Decimal,
    pub flash_loan_cost_usd: Decimal,
    pub gas_cost_usd: Decimal,
    pub total_costs_usd: Decimal,
    pub net_profit_usd: Decimal,
    /// Bounded risk score in [0, 100].
    pub risk_score: Decimal,
    pub risk_factors: Vec<String>,
    pub breakdown: SimulationBreakdown,
    pub reason: Option<String>,
    pub simulated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct SimulationBreakdown {
    pub buy_source: String,
    pub sell_source: String,
    /// Effective prices after the liquidity-impact slippage model.
    pub effective_buy_price: Decimal,
    pub effective_sell_price: Decimal,
    pub observed_spread_pct: Decimal,
    pub size_impact_pct: Decimal,
    pub flash_loan_fee_rate: Decimal,
    pub gas_price_gwei: Decimal,
    pub estimated_gas_units: u64,
}

impl SimulationResult {
    /// An invalid result carrying only the rejection reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            gross_profit_usd: Decimal::ZERO,
            flash_loan_cost_usd: Decimal::ZERO,
            gas_cost_usd: Decimal::ZERO,
            total_costs_usd: Decimal::ZERO,
            net_profit_usd: Decimal::ZERO,
            risk_score: Decimal::ZERO,
            risk_factors: Vec::new(),
            breakdown: SimulationBreakdown::default(),
            reason: Some(reason.into()),
            simulated_at: Utc::now(),
        }
    }
}
