//! Gas price oracle with cached HTTP upstream and constant fallback

use async_trait::async_trait;
use rust_decimal::prelude::*;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use super::GasOracle;
use crate::config::DEFAULT_GAS_PRICE_GWEI;

const GAS_CACHE_TTL: Duration = Duration::from_secs(30);

/// Pulls a gas price from an HTTP endpoint returning
/// `{"gas_price_gwei": <number>}`, caches it for 30 seconds, and falls
/// back to a constant when the upstream is unreachable or unconfigured.
pub struct HttpGasOracle {
    url: Option<String>,
    api_key: Option<String>,
    fallback_gwei: Decimal,
    client: reqwest::Client,
    cache: RwLock<Option<(Instant, Decimal)>>,
}

impl HttpGasOracle {
    pub fn new(url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            url,
            api_key,
            fallback_gwei: Decimal::from(DEFAULT_GAS_PRICE_GWEI),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(3))
                .build()
                .unwrap_or_default(),
            cache: RwLock::new(None),
        }
    }

    async fn fetch_upstream(&self) -> Option<Decimal> {
        let url = self.url.as_ref()?;

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", key);
        }

        let response = match request.send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("Gas oracle returned status {}", r.status());
                return None;
            }
            Err(e) => {
                warn!("Gas oracle request failed: {}", e);
                return None;
            }
        };

        let json: serde_json::Value = response.json().await.ok()?;
        json["gas_price_gwei"]
            .as_f64()
            .and_then(Decimal::from_f64)
            .filter(|p| *p > Decimal::ZERO)
    }
}

#[async_trait]
impl GasOracle for HttpGasOracle {
    async fn current_gas_price_gwei(&self) -> Decimal {
        if let Some((fetched, price)) = *self.cache.read().await {
            if fetched.elapsed() < GAS_CACHE_TTL {
                return price;
            }
        }

        match self.fetch_upstream().await {
            Some(price) => {
                *self.cache.write().await = Some((Instant::now(), price));
                price
            }
            None => {
                if self.url.is_some() {
                    warn!(
                        "All gas oracles failed, using fallback {} gwei",
                        self.fallback_gwei
                    );
                }
                self.fallback_gwei
            }
        }
    }
}
