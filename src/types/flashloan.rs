//! Flash loan provider quote types

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FlashLoanQuote {
    pub provider: String,
    pub fee_rate: Decimal,
    pub max_liquidity: Decimal,
}
