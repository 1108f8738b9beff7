//! Deterministic trade simulation
//!
//! Re-prices a candidate trade against a fresh spread snapshot using a
//! liquidity-impact slippage model, accounts every cost in USD, and
//! scores the residual risk. Same inputs always produce the same result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::debug;

use crate::aggregator::PriceAggregator;
use crate::gate::gas_cost_percent;
use crate::simulator::risk::{risk_score, RiskInputs};
use crate::types::{Quote, SimulationBreakdown, SimulationResult};

pub struct TradeSimulator {
    aggregator: Arc<PriceAggregator>,
    risk_threshold: Decimal,
    estimated_gas_units: u64,
}

impl TradeSimulator {
    pub fn new(
        aggregator: Arc<PriceAggregator>,
        risk_threshold: Decimal,
        estimated_gas_units: u64,
    ) -> Self {
        Self {
            aggregator,
            risk_threshold,
            estimated_gas_units,
        }
    }

    /// Simulates buying `amount_eth` on the cheapest source and selling on
    /// the dearest, funded by a flash loan at `flash_loan_fee_rate`.
    ///
    /// A trade is valid only when the net profit is positive and the risk
    /// score stays below the acceptance threshold.
    pub async fn simulate(
        &self,
        pair: &str,
        amount_eth: Decimal,
        gas_price_gwei: Decimal,
        flash_loan_fee_rate: Decimal,
    ) -> SimulationResult {
        let snapshot = self.aggregator.get_spread(pair, amount_eth).await;

        let (buy, sell) = match (&snapshot.lowest, &snapshot.highest) {
            (Some(buy), Some(sell)) => (buy.clone(), sell.clone()),
            _ => return SimulationResult::invalid("insufficient market data"),
        };

        if snapshot.spread_pct <= dec!(0) {
            return SimulationResult::invalid("no positive spread between sources");
        }

        // Deterministic slippage: buying pushes the price up, selling
        // pushes it down, each by amount / (liquidity + amount).
        let buy_impact = liquidity_impact(amount_eth, buy.liquidity);
        let sell_impact = liquidity_impact(amount_eth, sell.liquidity);
        let effective_buy_price = buy.price * (dec!(1) + buy_impact);
        let effective_sell_price = sell.price * (dec!(1) - sell_impact);

        let gross_profit_usd = (effective_sell_price - effective_buy_price) * amount_eth;

        // Flash-loan fee is charged on the borrowed notional, priced at
        // the buy side.
        let flash_loan_cost_usd = amount_eth * flash_loan_fee_rate * buy.price;

        let mid_price = (buy.price + sell.price) / dec!(2);
        let gas_cost_eth = gas_cost_percent(gas_price_gwei, self.estimated_gas_units, dec!(1));
        let gas_cost_usd = gas_cost_eth * mid_price;

        let total_costs_usd = flash_loan_cost_usd + gas_cost_usd;
        let net_profit_usd = gross_profit_usd - total_costs_usd;

        let profit_margin_pct = if gross_profit_usd > dec!(0) {
            net_profit_usd / gross_profit_usd * dec!(100)
        } else {
            dec!(0)
        };
        let size_impact_pct = (buy_impact + sell_impact) / dec!(2) * dec!(100);

        let (score, risk_factors) = risk_score(&RiskInputs {
            profit_margin_pct,
            gas_price_gwei,
            size_impact_pct,
            volatility_pct: quote_dispersion_pct(&snapshot.quotes),
        });

        let reason = if net_profit_usd <= dec!(0) {
            Some("unprofitable after costs".to_string())
        } else if score >= self.risk_threshold {
            Some(format!(
                "risk score {} at or above threshold {}",
                score.round_dp(1),
                self.risk_threshold
            ))
        } else {
            None
        };
        let valid = reason.is_none();

        debug!(
            "Simulated {} for {}: net {} USD, risk {}, valid {}",
            pair,
            amount_eth,
            net_profit_usd.round_dp(4),
            score.round_dp(1),
            valid
        );

        SimulationResult {
            valid,
            gross_profit_usd,
            flash_loan_cost_usd,
            gas_cost_usd,
            total_costs_usd,
            net_profit_usd,
            risk_score: score,
            risk_factors,
            breakdown: SimulationBreakdown {
                buy_source: buy.source,
                sell_source: sell.source,
                effective_buy_price,
                effective_sell_price,
                observed_spread_pct: snapshot.spread_pct,
                size_impact_pct,
                flash_loan_fee_rate,
                gas_price_gwei,
                estimated_gas_units: self.estimated_gas_units,
            },
            reason,
            simulated_at: chrono::Utc::now(),
        }
    }
}

/// Fractional price impact of trading `amount` against `liquidity`.
/// Degenerate liquidity consumes the whole book.
fn liquidity_impact(amount: Decimal, liquidity: Decimal) -> Decimal {
    if liquidity <= dec!(0) {
        return dec!(1);
    }
    amount / (liquidity + amount)
}

/// Price dispersion across the quote set as a percentage of the mean.
fn quote_dispersion_pct(quotes: &[Quote]) -> Decimal {
    if quotes.len() < 2 {
        return dec!(0);
    }
    let mut min = quotes[0].price;
    let mut max = quotes[0].price;
    let mut sum = dec!(0);
    for quote in quotes {
        min = min.min(quote.price);
        max = max.max(quote.price);
        sum += quote.price;
    }
    let mean = sum / Decimal::from(quotes.len() as u64);
    if mean <= dec!(0) {
        return dec!(0);
    }
    (max - min) / mean * dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::PriceSource;
    use crate::errors::BotResult;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;

    struct BookSource {
        name: String,
        price: Decimal,
        liquidity: Decimal,
    }

    impl BookSource {
        fn new(name: &str, price: Decimal, liquidity: Decimal) -> Arc<dyn PriceSource> {
            Arc::new(Self {
                name: name.to_string(),
                price,
                liquidity,
            })
        }
    }

    #[async_trait]
    impl PriceSource for BookSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn quote(&self, _pair: &str, _amount: Decimal) -> BotResult<Quote> {
            Ok(Quote {
                source: self.name.clone(),
                price: self.price,
                liquidity: self.liquidity,
                fee_rate: dec!(0.003),
                fetched_at: Utc::now(),
            })
        }
    }

    fn simulator(sources: Vec<Arc<dyn PriceSource>>) -> TradeSimulator {
        let aggregator = Arc::new(PriceAggregator::new(
            sources,
            Duration::from_secs(10),
            Duration::from_millis(100),
        ));
        TradeSimulator::new(aggregator, dec!(70), 350_000)
    }

    #[tokio::test]
    async fn fixed_inputs_produce_exact_numbers() {
        let sim = simulator(vec![
            BookSource::new("DexA", dec!(2000), dec!(999)),
            BookSource::new("DexB", dec!(2050), dec!(999)),
        ]);

        let result = sim.simulate("ETH/USDC", dec!(1), dec!(4), dec!(0.0005)).await;

        // Impact is 1/(999+1) = 0.1% per side.
        assert_eq!(result.breakdown.effective_buy_price, dec!(2002));
        assert_eq!(result.breakdown.effective_sell_price, dec!(2047.95));
        assert_eq!(result.gross_profit_usd, dec!(45.95));
        assert_eq!(result.flash_loan_cost_usd, dec!(1));
        // 4 gwei * 350k units = 0.0014 ETH at the 2025 mid price.
        assert_eq!(result.gas_cost_usd, dec!(2.835));
        assert_eq!(result.net_profit_usd, dec!(42.115));
        assert_eq!(result.breakdown.size_impact_pct, dec!(0.1));
        assert!(result.risk_score < dec!(10));
        assert!(result.valid);
        assert!(result.reason.is_none());

        // Determinism: the cached snapshot and pure arithmetic give the
        // identical result on a second run.
        let again = sim.simulate("ETH/USDC", dec!(1), dec!(4), dec!(0.0005)).await;
        assert_eq!(again.net_profit_usd, result.net_profit_usd);
        assert_eq!(again.risk_score, result.risk_score);
    }

    #[tokio::test]
    async fn zero_spread_is_invalid() {
        let sim = simulator(vec![
            BookSource::new("DexA", dec!(2000), dec!(999)),
            BookSource::new("DexB", dec!(2000), dec!(999)),
        ]);

        let result = sim.simulate("ETH/USDC", dec!(1), dec!(4), dec!(0.0005)).await;
        assert!(!result.valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("no positive spread between sources")
        );
    }

    #[tokio::test]
    async fn missing_market_data_is_invalid() {
        let sim = simulator(vec![BookSource::new("DexA", dec!(2000), dec!(999))]);

        let result = sim.simulate("ETH/USDC", dec!(1), dec!(4), dec!(0.0005)).await;
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("insufficient market data"));
    }

    #[tokio::test]
    async fn costs_exceeding_gross_invalidate_the_trade() {
        // A 0.025% raw spread is eaten by slippage alone.
        let sim = simulator(vec![
            BookSource::new("DexA", dec!(2000), dec!(999)),
            BookSource::new("DexB", dec!(2000.5), dec!(999)),
        ]);

        let result = sim.simulate("ETH/USDC", dec!(1), dec!(4), dec!(0.0005)).await;
        assert!(!result.valid);
        assert!(result.net_profit_usd <= dec!(0));
        assert_eq!(result.reason.as_deref(), Some("unprofitable after costs"));
    }

    #[tokio::test]
    async fn profitable_but_risky_trade_is_rejected() {
        // Thin books, expensive gas, fat fee: every risk factor fires
        // while the net profit stays barely positive.
        let sim = simulator(vec![
            BookSource::new("DexA", dec!(100), dec!(30)),
            BookSource::new("DexB", dec!(120), dec!(30)),
        ]);

        let result = sim.simulate("ETH/USDC", dec!(1), dec!(150), dec!(0.065)).await;
        assert!(result.net_profit_usd > dec!(0));
        assert!(result.risk_score >= dec!(70));
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("risk score"));
    }
}
