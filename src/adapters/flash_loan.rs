//! Built-in flash-loan providers
//!
//! Major lending pools advertise flat flash-loan fees, so the built-ins
//! carry a fixed rate and a liquidity ceiling. Anything market-driven
//! belongs in its own `FlashLoanProvider` implementation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use super::FlashLoanProvider;
use crate::errors::BotResult;

pub struct FixedFeeProvider {
    name: String,
    fee_rate: Decimal,
    max_liquidity: Decimal,
}

impl FixedFeeProvider {
    pub fn new(name: impl Into<String>, fee_rate: Decimal, max_liquidity: Decimal) -> Self {
        Self {
            name: name.into(),
            fee_rate,
            max_liquidity,
        }
    }

    /// Aave V3: 0.05% flat fee, deep liquidity.
    pub fn aave_v3() -> Self {
        Self::new("Aave V3", dec!(0.0005), dec!(1000000))
    }

    /// Balancer vault: 0% fee.
    pub fn balancer() -> Self {
        Self::new("Balancer", dec!(0), dec!(500000))
    }

    /// dYdX: 0% fee, smaller ceiling.
    pub fn dydx() -> Self {
        Self::new("dYdX", dec!(0), dec!(100000))
    }

    pub fn default_set() -> Vec<Arc<dyn FlashLoanProvider>> {
        vec![
            Arc::new(Self::aave_v3()),
            Arc::new(Self::balancer()),
            Arc::new(Self::dydx()),
        ]
    }
}

#[async_trait]
impl FlashLoanProvider for FixedFeeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fee_for(&self, _amount: Decimal) -> BotResult<Decimal> {
        Ok(self.fee_rate)
    }

    async fn max_liquidity(&self) -> BotResult<Decimal> {
        Ok(self.max_liquidity)
    }
}
