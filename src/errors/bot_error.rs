//! Custom error types for the bot

use thiserror::Error;

/// Failure taxonomy for the evaluation pipeline.
///
/// Everything except `IntegrityViolation` is absorbed per cycle at the
/// monitoring-loop boundary; an integrity violation halts startup.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Source unavailable: {source_name} - {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Insufficient data for {pair}: only {quotes} quote(s) available")]
    InsufficientData { pair: String, quotes: usize },

    #[error("Simulation invalid for {pair}: {reason}")]
    SimulationInvalid { pair: String, reason: String },

    #[error("Safety pre-flight rejected {pair}: {reason}")]
    SafetyRejected { pair: String, reason: String },

    #[error("Execution failed for {pair}: {reason}")]
    ExecutionFailure { pair: String, reason: String },

    #[error("Integrity check failed with {violations} critical violation(s)")]
    IntegrityViolation { violations: usize },

    #[error("Storage error: {context}")]
    Storage {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type BotResult<T> = Result<T, BotError>;

impl BotError {
    pub fn source_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        BotError::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
            retry_count: 0,
        }
    }
}
