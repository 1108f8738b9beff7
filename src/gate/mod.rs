//! Minimum-spread gate
//!
//! Pure arithmetic, no I/O: a trade is only considered when the observed
//! cross-source spread covers the flash-loan fee, the gas cost and the
//! safety buffer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const WEI_PER_GWEI_FACTOR: Decimal = dec!(1000000000);

/// Required spread as a fractional rate of the notional.
///
/// `required = fee_rate + gas_cost_pct + safety_buffer`. There is no
/// zero-fee shortcut: with a free flash loan the gas cost and buffer
/// still apply.
pub fn minimum_spread(fee_rate: Decimal, gas_cost_pct: Decimal, safety_buffer: Decimal) -> Decimal {
    fee_rate + gas_cost_pct + safety_buffer
}

/// Gas cost as a fraction of the notional.
///
/// `gas_price_gwei * estimated_gas_units` is the cost in gwei; divided by
/// 1e9 it is the cost in the base asset, then normalized by the notional.
pub fn gas_cost_percent(
    gas_price_gwei: Decimal,
    estimated_gas_units: u64,
    notional_eth: Decimal,
) -> Decimal {
    if notional_eth <= dec!(0) {
        return dec!(0);
    }
    gas_price_gwei * Decimal::from(estimated_gas_units) / WEI_PER_GWEI_FACTOR / notional_eth
}

/// Whether an observed spread (percent) clears a required fractional rate.
pub fn clears_gate(observed_spread_pct: Decimal, required_rate: Decimal) -> bool {
    observed_spread_pct >= required_rate * dec!(100)
}
