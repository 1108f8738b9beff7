//! Cheapest flash-loan provider selection

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapters::FlashLoanProvider;
use crate::errors::{BotError, BotResult};
use crate::types::FlashLoanQuote;

/// Picks the minimum-fee provider able to cover a requested notional.
///
/// Ties are broken by declaration order. A provider whose fee or
/// liquidity query fails is excluded, never fatal.
pub struct FeeOptimizer {
    providers: Vec<Arc<dyn FlashLoanProvider>>,
}

impl FeeOptimizer {
    pub fn new(providers: Vec<Arc<dyn FlashLoanProvider>>) -> Self {
        Self { providers }
    }

    pub async fn get_optimal_provider(&self, amount: Decimal) -> BotResult<FlashLoanQuote> {
        let mut best: Option<FlashLoanQuote> = None;

        for provider in &self.providers {
            let max_liquidity = match provider.max_liquidity().await {
                Ok(l) => l,
                Err(e) => {
                    warn!("Provider {} liquidity query failed: {}", provider.name(), e);
                    continue;
                }
            };

            if max_liquidity < amount {
                debug!(
                    "Provider {} ceiling {} below requested {}",
                    provider.name(),
                    max_liquidity,
                    amount
                );
                continue;
            }

            let fee_rate = match provider.fee_for(amount).await {
                Ok(f) => f,
                Err(e) => {
                    warn!("Provider {} fee query failed: {}", provider.name(), e);
                    continue;
                }
            };

            // Strict comparison keeps the earliest-declared provider on ties.
            let better = match &best {
                Some(current) => fee_rate < current.fee_rate,
                None => true,
            };
            if better {
                best = Some(FlashLoanQuote {
                    provider: provider.name().to_string(),
                    fee_rate,
                    max_liquidity,
                });
            }
        }

        best.ok_or_else(|| {
            BotError::source_unavailable(
                "flash_loan_providers",
                format!("no provider can cover {}", amount),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct StubProvider {
        name: String,
        fee: BotResult<Decimal>,
        max: Decimal,
    }

    impl StubProvider {
        fn ok(name: &str, fee: Decimal, max: Decimal) -> Arc<dyn FlashLoanProvider> {
            Arc::new(Self {
                name: name.to_string(),
                fee: Ok(fee),
                max,
            })
        }

        fn broken(name: &str) -> Arc<dyn FlashLoanProvider> {
            Arc::new(Self {
                name: name.to_string(),
                fee: Err(BotError::source_unavailable(name, "rpc error")),
                max: dec!(1000000),
            })
        }
    }

    #[async_trait]
    impl FlashLoanProvider for StubProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fee_for(&self, _amount: Decimal) -> BotResult<Decimal> {
            match &self.fee {
                Ok(f) => Ok(*f),
                Err(_) => Err(BotError::source_unavailable(&self.name, "rpc error")),
            }
        }

        async fn max_liquidity(&self) -> BotResult<Decimal> {
            Ok(self.max)
        }
    }

    #[tokio::test]
    async fn selects_minimum_fee() {
        let optimizer = FeeOptimizer::new(vec![
            StubProvider::ok("Aave V3", dec!(0.0005), dec!(1000000)),
            StubProvider::ok("Balancer", dec!(0), dec!(500000)),
        ]);

        let quote = optimizer.get_optimal_provider(dec!(100)).await.unwrap();
        assert_eq!(quote.provider, "Balancer");
        assert_eq!(quote.fee_rate, dec!(0));
    }

    #[tokio::test]
    async fn ties_break_by_declaration_order() {
        let optimizer = FeeOptimizer::new(vec![
            StubProvider::ok("Balancer", dec!(0), dec!(500000)),
            StubProvider::ok("dYdX", dec!(0), dec!(100000)),
        ]);

        let quote = optimizer.get_optimal_provider(dec!(100)).await.unwrap();
        assert_eq!(quote.provider, "Balancer");
    }

    #[tokio::test]
    async fn filters_out_insufficient_liquidity() {
        let optimizer = FeeOptimizer::new(vec![
            StubProvider::ok("dYdX", dec!(0), dec!(50)),
            StubProvider::ok("Aave V3", dec!(0.0005), dec!(1000000)),
        ]);

        let quote = optimizer.get_optimal_provider(dec!(100)).await.unwrap();
        assert_eq!(quote.provider, "Aave V3");
    }

    #[tokio::test]
    async fn tolerates_a_failing_provider() {
        let optimizer = FeeOptimizer::new(vec![
            StubProvider::broken("Equalizer"),
            StubProvider::ok("Aave V3", dec!(0.0005), dec!(1000000)),
        ]);

        let quote = optimizer.get_optimal_provider(dec!(100)).await.unwrap();
        assert_eq!(quote.provider, "Aave V3");
    }

    #[tokio::test]
    async fn no_capable_provider_is_an_error() {
        let optimizer = FeeOptimizer::new(vec![StubProvider::ok("dYdX", dec!(0), dec!(50))]);

        let result = optimizer.get_optimal_provider(dec!(100)).await;
        assert!(matches!(result, Err(BotError::SourceUnavailable { .. })));
    }
}
