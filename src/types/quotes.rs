//! Price quote and spread snapshot types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A single price observation from one source. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub source: String,
    pub price: Decimal,
    /// Observed liquidity on the source, in base-asset units.
    pub liquidity: Decimal,
    pub fee_rate: Decimal,
    pub fetched_at: DateTime<Utc>,
}

/// Cross-source spread for one pair at one trade size.
///
/// The lowest quote is the buy side, the highest the sell side. A snapshot
/// with fewer than two quotes carries a zero spread and no sides.
#[derive(Debug, Clone, Serialize)]
pub struct SpreadSnapshot {
    pub pair: String,
    pub highest: Option<Quote>,
    pub lowest: Option<Quote>,
    pub spread_pct: Decimal,
    pub quotes: Vec<Quote>,
    pub computed_at: DateTime<Utc>,
}

impl SpreadSnapshot {
    pub fn no_data(pair: &str) -> Self {
        Self {
            pair: pair.to_string(),
            highest: None,
            lowest: None,
            spread_pct: dec!(0),
            quotes: Vec::new(),
            computed_at: Utc::now(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.highest.is_some() && self.lowest.is_some()
    }
}
