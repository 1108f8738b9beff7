//! Pair-score persistence

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::errors::{BotError, BotResult};
use crate::types::PairScore;

/// Storage backend for the per-pair outcome history.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn load_all(&self) -> BotResult<HashMap<String, PairScore>>;
    async fn save_all(&self, scores: &HashMap<String, PairScore>) -> BotResult<()>;
}

/// Single-JSON-file backend. Saves go through a temp file and an atomic
/// rename so a crash mid-write never truncates the history.
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScoreStore for JsonFileScoreStore {
    async fn load_all(&self) -> BotResult<HashMap<String, PairScore>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| BotError::Storage {
            context: format!("reading score file {}", self.path.display()),
            source: e.into(),
        })?;

        serde_json::from_str(&raw).map_err(|e| BotError::Storage {
            context: format!("parsing score file {}", self.path.display()),
            source: e.into(),
        })
    }

    async fn save_all(&self, scores: &HashMap<String, PairScore>) -> BotResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| BotError::Storage {
                context: format!("creating score directory {}", parent.display()),
                source: e.into(),
            })?;
        }

        let json = serde_json::to_string_pretty(scores).map_err(|e| BotError::Storage {
            context: "serializing pair scores".to_string(),
            source: e.into(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| BotError::Storage {
            context: format!("writing score temp file {}", tmp.display()),
            source: e.into(),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| BotError::Storage {
            context: format!("replacing score file {}", self.path.display()),
            source: e.into(),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileScoreStore::new(dir.path().join("pair_scores.json"));

        let scores = store.load_all().await.unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn saved_scores_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory").join("pair_scores.json");
        let store = JsonFileScoreStore::new(&path);

        let mut scores = HashMap::new();
        let mut score = PairScore::new("ETH/USDC");
        score.attempts = 3;
        score.wins = 2;
        score.losses = 1;
        score.total_profit_usd = dec!(91.5);
        scores.insert("ETH/USDC".to_string(), score);

        store.save_all(&scores).await.unwrap();

        let reloaded = JsonFileScoreStore::new(&path).load_all().await.unwrap();
        let score = &reloaded["ETH/USDC"];
        assert_eq!(score.attempts, 3);
        assert_eq!(score.wins, 2);
        assert_eq!(score.total_profit_usd, dec!(91.5));
        // No temp file left behind after the rename.
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair_scores.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileScoreStore::new(&path).load_all().await;
        assert!(matches!(result, Err(BotError::Storage { .. })));
    }
}
