//! Pair scoring memory
//!
//! The single writer of [`PairScore`] records. Outcomes are recorded only
//! for attempts that reached execution; gate and simulation rejections
//! never touch these statistics. Every mutation is persisted through the
//! backing [`ScoreStore`] before the write lock is released.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::BotResult;
use crate::storage::ScoreStore;
use crate::types::{PairScore, ScoreSummary};

pub struct ScoringMemory {
    scores: RwLock<HashMap<String, PairScore>>,
    store: Arc<dyn ScoreStore>,
    max_failed_attempts: u32,
}

impl ScoringMemory {
    /// Loads the persisted history from the store.
    pub async fn load(store: Arc<dyn ScoreStore>, max_failed_attempts: u32) -> BotResult<Self> {
        let scores = store.load_all().await?;
        info!("📊 Loaded scoring history for {} pair(s)", scores.len());
        Ok(Self {
            scores: RwLock::new(scores),
            store,
            max_failed_attempts,
        })
    }

    /// Records a win or loss for a pair and persists the updated map.
    ///
    /// Maintains `attempts == wins + losses` and the streak counters.
    pub async fn record_outcome(
        &self,
        pair: &str,
        success: bool,
        profit_usd: Decimal,
    ) -> BotResult<()> {
        let mut scores = self.scores.write().await;
        let score = scores
            .entry(pair.to_string())
            .or_insert_with(|| PairScore::new(pair));

        score.attempts += 1;
        if success {
            score.wins += 1;
            score.consecutive_wins += 1;
            score.consecutive_losses = 0;
            score.max_consecutive_wins = score.max_consecutive_wins.max(score.consecutive_wins);
        } else {
            score.losses += 1;
            score.consecutive_losses += 1;
            score.consecutive_wins = 0;
            score.max_consecutive_losses =
                score.max_consecutive_losses.max(score.consecutive_losses);
        }
        score.total_profit_usd += profit_usd;
        score.best_profit_usd = score.best_profit_usd.max(profit_usd);
        score.last_seen = Utc::now();

        debug!(
            "Recorded {} for {}: {}W/{}L, streak {}L",
            if success { "win" } else { "loss" },
            pair,
            score.wins,
            score.losses,
            score.consecutive_losses
        );

        self.store.save_all(&scores).await
    }

    /// Whether a pair's loss streak disqualifies it from further attempts.
    ///
    /// A pair is skipped only when it has lost `max_failed_attempts` times
    /// in a row and has never won. Pure read, no state change.
    pub async fn should_skip(&self, pair: &str) -> bool {
        let scores = self.scores.read().await;
        match scores.get(pair) {
            Some(score) => {
                score.consecutive_losses >= self.max_failed_attempts && score.wins == 0
            }
            None => false,
        }
    }

    pub async fn get_score(&self, pair: &str) -> Option<PairScore> {
        self.scores.read().await.get(pair).cloned()
    }

    /// Drops pairs not seen within the retention window. Returns how many
    /// were removed.
    pub async fn prune_stale(&self, retention_days: i64) -> BotResult<usize> {
        let cutoff = Utc::now() - Duration::days(retention_days);
        let mut scores = self.scores.write().await;
        let before = scores.len();
        scores.retain(|_, score| score.last_seen >= cutoff);
        let removed = before - scores.len();

        if removed > 0 {
            info!("📊 Pruned {} stale pair score(s)", removed);
            self.store.save_all(&scores).await?;
        }
        Ok(removed)
    }

    /// Clears one pair's history, e.g. to lift a loss-streak skip by hand.
    pub async fn reset_pair(&self, pair: &str) -> BotResult<bool> {
        let mut scores = self.scores.write().await;
        let removed = scores.remove(pair).is_some();
        if removed {
            info!("📊 Reset scoring history for {}", pair);
            self.store.save_all(&scores).await?;
        }
        Ok(removed)
    }

    pub async fn summary(&self) -> ScoreSummary {
        let scores = self.scores.read().await;
        let mut summary = ScoreSummary {
            total_pairs: scores.len(),
            ..Default::default()
        };

        let mut best: Option<(&str, Decimal)> = None;
        let mut worst: Option<(&str, Decimal)> = None;
        for (pair, score) in scores.iter() {
            summary.total_attempts += score.attempts;
            summary.total_wins += score.wins;
            summary.total_losses += score.losses;
            summary.total_profit_usd += score.total_profit_usd;

            if best.map_or(true, |(_, p)| score.total_profit_usd > p) {
                best = Some((pair, score.total_profit_usd));
            }
            if worst.map_or(true, |(_, p)| score.total_profit_usd < p) {
                worst = Some((pair, score.total_profit_usd));
            }
        }

        if summary.total_attempts > 0 {
            summary.overall_success_rate_pct = Decimal::from(summary.total_wins)
                / Decimal::from(summary.total_attempts)
                * Decimal::from(100);
        }
        summary.best_pair = best.map(|(pair, _)| pair.to_string());
        summary.worst_pair = worst.map(|(pair, _)| pair.to_string());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileScoreStore;
    use rust_decimal_macros::dec;

    async fn memory_in(dir: &tempfile::TempDir) -> ScoringMemory {
        let store = Arc::new(JsonFileScoreStore::new(dir.path().join("scores.json")));
        ScoringMemory::load(store, 5).await.unwrap()
    }

    #[tokio::test]
    async fn attempts_always_equal_wins_plus_losses() {
        let dir = tempfile::tempdir().unwrap();
        let memory = memory_in(&dir).await;

        for success in [true, false, false, true, false] {
            let profit = if success { dec!(10) } else { dec!(-4) };
            memory.record_outcome("ETH/USDC", success, profit).await.unwrap();
            let score = memory.get_score("ETH/USDC").await.unwrap();
            assert_eq!(score.attempts, score.wins + score.losses);
        }

        let score = memory.get_score("ETH/USDC").await.unwrap();
        assert_eq!(score.wins, 2);
        assert_eq!(score.losses, 3);
        assert_eq!(score.total_profit_usd, dec!(8));
        assert_eq!(score.best_profit_usd, dec!(10));
        assert_eq!(score.consecutive_losses, 1);
        assert_eq!(score.max_consecutive_losses, 2);
        assert_eq!(score.max_consecutive_wins, 1);
    }

    #[tokio::test]
    async fn skips_only_after_a_full_loss_streak_with_no_wins() {
        let dir = tempfile::tempdir().unwrap();
        let memory = memory_in(&dir).await;

        assert!(!memory.should_skip("ETH/USDC").await);

        for _ in 0..4 {
            memory.record_outcome("ETH/USDC", false, dec!(-2)).await.unwrap();
        }
        assert!(!memory.should_skip("ETH/USDC").await);

        memory.record_outcome("ETH/USDC", false, dec!(-2)).await.unwrap();
        assert!(memory.should_skip("ETH/USDC").await);

        // A single historical win lifts the skip even on a long streak.
        let memory2 = memory_in(&dir).await;
        memory2.record_outcome("ETH/USDT", true, dec!(5)).await.unwrap();
        for _ in 0..7 {
            memory2.record_outcome("ETH/USDT", false, dec!(-2)).await.unwrap();
        }
        assert!(!memory2.should_skip("ETH/USDT").await);
    }

    #[tokio::test]
    async fn should_skip_does_not_mutate() {
        let dir = tempfile::tempdir().unwrap();
        let memory = memory_in(&dir).await;

        for _ in 0..5 {
            memory.record_outcome("ETH/USDC", false, dec!(-1)).await.unwrap();
        }
        assert!(memory.should_skip("ETH/USDC").await);
        assert!(memory.should_skip("ETH/USDC").await);

        let score = memory.get_score("ETH/USDC").await.unwrap();
        assert_eq!(score.attempts, 5);
    }

    #[tokio::test]
    async fn history_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let memory = memory_in(&dir).await;
            memory.record_outcome("ETH/USDC", true, dec!(42.1)).await.unwrap();
        }

        let reloaded = memory_in(&dir).await;
        let score = reloaded.get_score("ETH/USDC").await.unwrap();
        assert_eq!(score.wins, 1);
        assert_eq!(score.total_profit_usd, dec!(42.1));
    }

    #[tokio::test]
    async fn reset_clears_one_pair() {
        let dir = tempfile::tempdir().unwrap();
        let memory = memory_in(&dir).await;
        for _ in 0..5 {
            memory.record_outcome("ETH/USDC", false, dec!(-1)).await.unwrap();
        }
        assert!(memory.should_skip("ETH/USDC").await);

        assert!(memory.reset_pair("ETH/USDC").await.unwrap());
        assert!(!memory.should_skip("ETH/USDC").await);
        assert!(memory.get_score("ETH/USDC").await.is_none());
        assert!(!memory.reset_pair("ETH/USDC").await.unwrap());
    }

    #[tokio::test]
    async fn prune_drops_entries_outside_the_retention_window() {
        let dir = tempfile::tempdir().unwrap();
        let memory = memory_in(&dir).await;
        memory.record_outcome("ETH/USDC", true, dec!(1)).await.unwrap();

        assert_eq!(memory.prune_stale(30).await.unwrap(), 0);
        assert!(memory.get_score("ETH/USDC").await.is_some());

        // Zero-day retention makes any past observation stale.
        assert_eq!(memory.prune_stale(0).await.unwrap(), 1);
        assert!(memory.get_score("ETH/USDC").await.is_none());
    }

    #[tokio::test]
    async fn summary_aggregates_across_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let memory = memory_in(&dir).await;
        memory.record_outcome("ETH/USDC", true, dec!(40)).await.unwrap();
        memory.record_outcome("ETH/USDC", true, dec!(20)).await.unwrap();
        memory.record_outcome("ETH/USDT", false, dec!(-10)).await.unwrap();
        memory.record_outcome("WBTC/USDC", true, dec!(5)).await.unwrap();

        let summary = memory.summary().await;
        assert_eq!(summary.total_pairs, 3);
        assert_eq!(summary.total_attempts, 4);
        assert_eq!(summary.total_wins, 3);
        assert_eq!(summary.total_losses, 1);
        assert_eq!(summary.total_profit_usd, dec!(55));
        assert_eq!(summary.overall_success_rate_pct, dec!(75));
        assert_eq!(summary.best_pair.as_deref(), Some("ETH/USDC"));
        assert_eq!(summary.worst_pair.as_deref(), Some("ETH/USDT"));
    }
}
