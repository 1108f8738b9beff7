//! Cycle-level circuit breaker for the monitoring loop
//!
//! Distinct from the per-pair circuit breaker owned by `ScoringMemory`:
//! this one trips when whole monitoring cycles keep failing, and cools
//! down on a timer.

use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info};

pub struct CircuitBreaker {
    consecutive_errors: RwLock<u32>,
    is_open: RwLock<bool>,
    last_error_time: RwLock<Option<Instant>>,
    max_consecutive_errors: u32,
    cooldown_duration: Duration,
}

impl CircuitBreaker {
    pub fn new(max_consecutive_errors: u32, cooldown_secs: u64) -> Self {
        Self {
            consecutive_errors: RwLock::new(0),
            is_open: RwLock::new(false),
            last_error_time: RwLock::new(None),
            max_consecutive_errors,
            cooldown_duration: Duration::from_secs(cooldown_secs),
        }
    }

    pub async fn record_success(&self) {
        *self.consecutive_errors.write().await = 0;
        *self.is_open.write().await = false;
    }

    pub async fn record_error(&self) -> bool {
        let mut errors = self.consecutive_errors.write().await;
        *errors += 1;

        if *errors >= self.max_consecutive_errors {
            *self.is_open.write().await = true;
            *self.last_error_time.write().await = Some(Instant::now());
            error!("Circuit breaker OPEN after {} consecutive errors", *errors);
            return true;
        }
        false
    }

    pub async fn can_proceed(&self) -> bool {
        let is_open = *self.is_open.read().await;
        if !is_open {
            return true;
        }

        if let Some(last_error) = *self.last_error_time.read().await {
            if last_error.elapsed() > self.cooldown_duration {
                info!("Circuit breaker cooldown complete, resetting");
                *self.is_open.write().await = false;
                *self.consecutive_errors.write().await = 0;
                return true;
            }
        }
        false
    }

    pub async fn is_open(&self) -> bool {
        *self.is_open.read().await
    }

    pub async fn consecutive_errors(&self) -> u32 {
        *self.consecutive_errors.read().await
    }
}
