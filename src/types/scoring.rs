//! Per-pair outcome history types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Persisted outcome history for one pair.
///
/// Invariant: `attempts == wins + losses` after every update. Only
/// `ScoringMemory` mutates these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairScore {
    pub pair: String,
    pub attempts: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_profit_usd: Decimal,
    pub best_profit_usd: Decimal,
    pub consecutive_wins: u32,
    pub consecutive_losses: u32,
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl PairScore {
    pub fn new(pair: &str) -> Self {
        let now = Utc::now();
        Self {
            pair: pair.to_string(),
            attempts: 0,
            wins: 0,
            losses: 0,
            total_profit_usd: dec!(0),
            best_profit_usd: dec!(0),
            consecutive_wins: 0,
            consecutive_losses: 0,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
            first_seen: now,
            last_seen: now,
        }
    }

    pub fn success_rate_pct(&self) -> Decimal {
        if self.attempts == 0 {
            return dec!(0);
        }
        Decimal::from(self.wins) / Decimal::from(self.attempts) * dec!(100)
    }
}

/// Aggregate view across all tracked pairs, printed at shutdown.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ScoreSummary {
    pub total_pairs: usize,
    pub total_attempts: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub total_profit_usd: Decimal,
    pub overall_success_rate_pct: Decimal,
    pub best_pair: Option<String>,
    pub worst_pair: Option<String>,
}
