//! Bounded risk scoring for a candidate trade

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Capped contribution per factor; the clamped sum stays in [0, 100].
const LOW_MARGIN_WEIGHT: Decimal = dec!(30);
const HIGH_GAS_WEIGHT: Decimal = dec!(25);
const LARGE_SIZE_WEIGHT: Decimal = dec!(20);
const VOLATILITY_CAP: Decimal = dec!(20);

const LOW_MARGIN_THRESHOLD_PCT: Decimal = dec!(5);
const HIGH_GAS_THRESHOLD_GWEI: Decimal = dec!(100);
const LARGE_IMPACT_THRESHOLD_PCT: Decimal = dec!(1);
const VOLATILITY_SCALE: Decimal = dec!(2);

#[derive(Debug, Clone)]
pub struct RiskInputs {
    pub profit_margin_pct: Decimal,
    pub gas_price_gwei: Decimal,
    pub size_impact_pct: Decimal,
    /// Relative dispersion of the quote set, a proxy for short-term
    /// market volatility.
    pub volatility_pct: Decimal,
}

/// Weighted, capped risk score clamped to [0, 100], with the factors
/// that fired.
pub fn risk_score(inputs: &RiskInputs) -> (Decimal, Vec<String>) {
    let mut score = dec!(0);
    let mut factors = Vec::new();

    if inputs.profit_margin_pct < LOW_MARGIN_THRESHOLD_PCT {
        score += LOW_MARGIN_WEIGHT;
        factors.push("low profit margin".to_string());
    }

    if inputs.gas_price_gwei > HIGH_GAS_THRESHOLD_GWEI {
        score += HIGH_GAS_WEIGHT;
        factors.push("high gas price".to_string());
    }

    if inputs.size_impact_pct > LARGE_IMPACT_THRESHOLD_PCT {
        score += LARGE_SIZE_WEIGHT;
        factors.push("large trade size vs liquidity".to_string());
    }

    let volatility_component = (inputs.volatility_pct * VOLATILITY_SCALE).min(VOLATILITY_CAP);
    if volatility_component > dec!(0) {
        score += volatility_component;
        factors.push("market volatility".to_string());
    }

    (score.clamp(dec!(0), dec!(100)), factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_trade_scores_low() {
        let (score, factors) = risk_score(&RiskInputs {
            profit_margin_pct: dec!(50),
            gas_price_gwei: dec!(30),
            size_impact_pct: dec!(0.1),
            volatility_pct: dec!(0.5),
        });
        assert_eq!(score, dec!(1.0));
        assert_eq!(factors, vec!["market volatility".to_string()]);
    }

    #[test]
    fn every_factor_fires_and_the_sum_is_clamped() {
        let (score, factors) = risk_score(&RiskInputs {
            profit_margin_pct: dec!(1),
            gas_price_gwei: dec!(150),
            size_impact_pct: dec!(5),
            volatility_pct: dec!(50),
        });
        assert_eq!(score, dec!(95));
        assert_eq!(factors.len(), 4);

        // The volatility contribution is capped, never dominant.
        let (capped, _) = risk_score(&RiskInputs {
            profit_margin_pct: dec!(50),
            gas_price_gwei: dec!(30),
            size_impact_pct: dec!(0.1),
            volatility_pct: dec!(500),
        });
        assert_eq!(capped, dec!(20));
    }
}
