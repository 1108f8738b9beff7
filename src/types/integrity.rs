//! Integrity check report types

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegrityStatus {
    Pass,
    Warning,
    CriticalFail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingSeverity {
    Critical,
    High,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityFinding {
    pub kind: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub status: IntegrityStatus,
    pub violations: Vec<IntegrityFinding>,
    pub warnings: Vec<IntegrityFinding>,
    pub checked_at: DateTime<Utc>,
}

impl IntegrityReport {
    pub fn is_critical(&self) -> bool {
        self.status == IntegrityStatus::CriticalFail
    }
}
