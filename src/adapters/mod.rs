//! External collaborator contracts and their built-in implementations
//!
//! The core pipeline only depends on these traits; concrete DEX, wallet and
//! chain plumbing stays behind them.

pub mod price_source;
pub mod flash_loan;
pub mod gas_oracle;
pub mod execution;

pub use price_source::*;
pub use flash_loan::*;
pub use gas_oracle::*;
pub use execution::*;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

use crate::errors::BotResult;
use crate::types::{ExecutionReceipt, Quote, TradeParams};

/// One price/liquidity source for a pair. Implementations must be safe to
/// call concurrently and must return an error rather than panic on
/// transient network failures.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;
    async fn quote(&self, pair: &str, amount: Decimal) -> BotResult<Quote>;
}

/// One flash-loan provider. Fees are fractional rates of the notional.
#[async_trait]
pub trait FlashLoanProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fee_for(&self, amount: Decimal) -> BotResult<Decimal>;
    async fn max_liquidity(&self) -> BotResult<Decimal>;
}

/// Gas price feed. Never fails: implementations fall back to an internal
/// constant when every upstream oracle is down.
#[async_trait]
pub trait GasOracle: Send + Sync {
    async fn current_gas_price_gwei(&self) -> Decimal;
}

/// Wallet + contract execution surface used by the coordinator.
#[async_trait]
pub trait ExecutionAdapter: Send + Sync {
    async fn submit(&self, params: &TradeParams) -> BotResult<String>;
    async fn await_confirmation(
        &self,
        tx_id: &str,
        timeout: Duration,
    ) -> BotResult<ExecutionReceipt>;
    async fn wallet_balance_eth(&self) -> BotResult<Decimal>;
    async fn contract_code_present(&self) -> BotResult<bool>;
    async fn pending_tx_count(&self) -> BotResult<u32>;
}
