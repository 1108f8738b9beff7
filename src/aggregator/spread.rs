//! Cross-source spread computation with partial-failure tolerance

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::adapters::PriceSource;
use crate::types::{Quote, SpreadSnapshot};

const MIN_QUOTES_FOR_SPREAD: usize = 2;

struct CachedSnapshot {
    snapshot: SpreadSnapshot,
    cached_at: Instant,
}

/// Fans quote requests out to every configured source, tolerating
/// per-source failures, and caches the resulting snapshot per
/// (pair, amount) key for a short TTL.
pub struct PriceAggregator {
    sources: Vec<Arc<dyn PriceSource>>,
    cache: RwLock<HashMap<(String, String), CachedSnapshot>>,
    cache_ttl: Duration,
    per_source_timeout: Duration,
}

impl PriceAggregator {
    pub fn new(
        sources: Vec<Arc<dyn PriceSource>>,
        cache_ttl: Duration,
        per_source_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            cache: RwLock::new(HashMap::new()),
            cache_ttl,
            per_source_timeout,
        }
    }

    /// Current spread snapshot for a pair at a trade size.
    ///
    /// Never fails wholesale: a source that errors or exceeds its timeout
    /// is excluded. With fewer than two usable quotes the snapshot is the
    /// "no data" sentinel (zero spread, no sides), which is not cached.
    pub async fn get_spread(&self, pair: &str, amount: Decimal) -> SpreadSnapshot {
        let key = (pair.to_string(), amount.to_string());

        if let Some(cached) = self.cache.read().await.get(&key) {
            if cached.cached_at.elapsed() < self.cache_ttl {
                return cached.snapshot.clone();
            }
        }

        let quotes = self.collect_quotes(pair, amount).await;

        if quotes.len() < MIN_QUOTES_FOR_SPREAD {
            debug!(
                "Only {} usable quote(s) for {}, no spread this cycle",
                quotes.len(),
                pair
            );
            return SpreadSnapshot::no_data(pair);
        }

        let snapshot = match compute_snapshot(pair, quotes) {
            Some(snapshot) => snapshot,
            None => return SpreadSnapshot::no_data(pair),
        };

        let mut cache = self.cache.write().await;
        // TTL-only eviction: sweep expired entries while holding the lock.
        cache.retain(|_, entry| entry.cached_at.elapsed() < self.cache_ttl);
        cache.insert(
            key,
            CachedSnapshot {
                snapshot: snapshot.clone(),
                cached_at: Instant::now(),
            },
        );

        snapshot
    }

    async fn collect_quotes(&self, pair: &str, amount: Decimal) -> Vec<Quote> {
        let fetches = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let pair = pair.to_string();
            async move {
                match tokio::time::timeout(self.per_source_timeout, source.quote(&pair, amount))
                    .await
                {
                    Ok(Ok(quote)) => Some(quote),
                    Ok(Err(e)) => {
                        warn!("Source {} unavailable for {}: {}", source.name(), pair, e);
                        None
                    }
                    Err(_) => {
                        warn!(
                            "Source {} timed out after {:?} for {}",
                            source.name(),
                            self.per_source_timeout,
                            pair
                        );
                        None
                    }
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

fn compute_snapshot(pair: &str, quotes: Vec<Quote>) -> Option<SpreadSnapshot> {
    let lowest = quotes.iter().min_by(|a, b| a.price.cmp(&b.price)).cloned()?;
    let highest = quotes.iter().max_by(|a, b| a.price.cmp(&b.price)).cloned()?;

    let spread_pct = if lowest.price > dec!(0) {
        (highest.price - lowest.price) / lowest.price * dec!(100)
    } else {
        dec!(0)
    };

    Some(SpreadSnapshot {
        pair: pair.to_string(),
        highest: Some(highest),
        lowest: Some(lowest),
        spread_pct,
        quotes,
        computed_at: chrono::Utc::now(),
    })
}
