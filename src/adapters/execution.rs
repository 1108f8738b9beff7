//! Simulated execution adapter
//!
//! Stands in for the wallet + flash-loan contract surface. Submission
//! returns a synthetic transaction id and confirmation applies a flat
//! slippage haircut against the expected profit, so a full pipeline run
//! works end to end without touching a chain.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

use super::ExecutionAdapter;
use crate::errors::{BotError, BotResult};
use crate::types::{ExecutionReceipt, TradeParams};

const SIMULATED_GAS_USED: u64 = 310_000;
const CONFIRMATION_LATENCY: Duration = Duration::from_millis(150);
// Realized profit haircut standing in for execution-side slippage.
const REALIZED_PROFIT_FACTOR: Decimal = dec!(0.95);

pub struct SimulatedExecutionAdapter {
    wallet_balance_eth: Decimal,
    pending: RwLock<HashMap<String, TradeParams>>,
}

impl SimulatedExecutionAdapter {
    pub fn new(wallet_balance_eth: Decimal) -> Self {
        Self {
            wallet_balance_eth,
            pending: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ExecutionAdapter for SimulatedExecutionAdapter {
    async fn submit(&self, params: &TradeParams) -> BotResult<String> {
        let tx_id = format!("0x{}", uuid::Uuid::new_v4().simple());
        info!(
            pair = %params.pair,
            provider = %params.flash_loan_provider,
            tx_id = %tx_id,
            "Submitted simulated flash-loan trade"
        );
        self.pending
            .write()
            .await
            .insert(tx_id.clone(), params.clone());
        Ok(tx_id)
    }

    async fn await_confirmation(
        &self,
        tx_id: &str,
        timeout: Duration,
    ) -> BotResult<ExecutionReceipt> {
        let params = self.pending.write().await.remove(tx_id).ok_or_else(|| {
            BotError::ExecutionFailure {
                pair: "unknown".to_string(),
                reason: format!("unknown transaction {}", tx_id),
            }
        })?;

        if CONFIRMATION_LATENCY > timeout {
            return Err(BotError::ExecutionFailure {
                pair: params.pair,
                reason: "confirmation timeout".to_string(),
            });
        }
        tokio::time::sleep(CONFIRMATION_LATENCY).await;

        let realized = params.expected_net_profit_usd * REALIZED_PROFIT_FACTOR;
        Ok(ExecutionReceipt {
            success: realized > Decimal::ZERO,
            tx_id: tx_id.to_string(),
            gas_used: SIMULATED_GAS_USED,
            realized_profit_usd: realized,
            detail: "simulated confirmation".to_string(),
        })
    }

    async fn wallet_balance_eth(&self) -> BotResult<Decimal> {
        Ok(self.wallet_balance_eth)
    }

    async fn contract_code_present(&self) -> BotResult<bool> {
        Ok(true)
    }

    async fn pending_tx_count(&self) -> BotResult<u32> {
        Ok(self.pending.read().await.len() as u32)
    }
}
