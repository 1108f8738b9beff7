//! HTTP ticker price source

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use super::PriceSource;
use crate::errors::{BotError, BotResult};
use crate::network::{retry_with_backoff, RetryConfig};
use crate::types::Quote;

// Sanity bounds for a USD-quoted major pair.
const MIN_VALID_PRICE: Decimal = dec!(1);
const MAX_VALID_PRICE: Decimal = dec!(1000000);

/// Price source backed by a ticker endpoint returning `{"price": "..."}`.
///
/// The URL carries a `{SYMBOL}` placeholder filled with the pair symbol
/// ("ETH/USDC" becomes "ETHUSDC"). Ticker APIs expose no depth, so the
/// observed liquidity is a configured per-source estimate.
pub struct TickerPriceSource {
    name: String,
    url_template: String,
    fee_rate: Decimal,
    assumed_liquidity: Decimal,
    client: reqwest::Client,
}

impl TickerPriceSource {
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        fee_rate: Decimal,
        assumed_liquidity: Decimal,
        timeout: Duration,
    ) -> BotResult<Self> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                warn!("Failed to initialize HTTP client for {}: {}", name, e);
                BotError::SourceUnavailable {
                    source_name: name.clone(),
                    message: "failed to build HTTP client".to_string(),
                    source: Some(e.into()),
                    retry_count: 0,
                }
            })?;

        Ok(Self {
            name,
            url_template: url_template.into(),
            fee_rate,
            assumed_liquidity,
            client,
        })
    }

    fn url_for(&self, pair: &str) -> String {
        let symbol = pair.replace('/', "");
        self.url_template.replace("{SYMBOL}", &symbol)
    }
}

#[async_trait]
impl PriceSource for TickerPriceSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn quote(&self, pair: &str, _amount: Decimal) -> BotResult<Quote> {
        let url = self.url_for(pair);

        let operation = || async {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow::anyhow!("ticker API error: {} - {}", status, body));
            }

            let json: serde_json::Value = response
                .json()
                .await
                .map_err(|e| anyhow::anyhow!("failed to parse JSON response: {}", e))?;

            let price_str = json["price"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("missing 'price' field in response"))?;

            Decimal::from_str(price_str).map_err(|e| anyhow::anyhow!("bad price string: {}", e))
        };

        let price = retry_with_backoff(
            operation,
            &RetryConfig {
                max_attempts: 2,
                initial_delay_ms: 100,
                ..Default::default()
            },
            &self.name,
        )
        .await?;

        if price < MIN_VALID_PRICE || price > MAX_VALID_PRICE {
            warn!("Invalid price from {}: {}", self.name, price);
            return Err(BotError::source_unavailable(
                &self.name,
                format!("price {} outside valid range", price),
            ));
        }

        Ok(Quote {
            source: self.name.clone(),
            price,
            liquidity: self.assumed_liquidity,
            fee_rate: self.fee_rate,
            fetched_at: Utc::now(),
        })
    }
}
