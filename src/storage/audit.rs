//! Execution attempt and integrity report storage

use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{ExecutionAttempt, IntegrityReport};

pub fn save_attempt(attempt: &ExecutionAttempt) -> Result<()> {
    save_attempt_in(Path::new("output/attempts"), attempt)
}

fn save_attempt_in(dir: &Path, attempt: &ExecutionAttempt) -> Result<()> {
    let filename = dir.join(format!("attempts_{}.jsonl", Utc::now().format("%Y-%m-%d")));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&filename)?;

    writeln!(file, "{}", serde_json::to_string(attempt)?)?;

    info!(
        attempt_id = %attempt.id,
        pair = %attempt.pair,
        state = ?attempt.state,
        realized_profit = ?attempt.realized_profit_usd,
        "Saved execution attempt"
    );

    Ok(())
}

pub fn save_integrity_report(report: &IntegrityReport) -> Result<PathBuf> {
    save_integrity_report_in(Path::new("output/reports"), report)
}

fn save_integrity_report_in(dir: &Path, report: &IntegrityReport) -> Result<PathBuf> {
    let filename = dir.join(format!(
        "integrity_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));

    std::fs::write(&filename, serde_json::to_string_pretty(report)?)?;

    info!(
        status = ?report.status,
        violations = report.violations.len(),
        warnings = report.warnings.len(),
        "Saved integrity report"
    );

    Ok(filename)
}
