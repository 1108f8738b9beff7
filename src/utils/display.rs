//! Display and printing utilities

use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

use crate::errors::CircuitBreaker;
use crate::types::{AttemptState, ExecutionAttempt, IntegrityReport, IntegrityStatus, ScoreSummary};

pub fn print_attempt(attempt: &ExecutionAttempt) {
    match attempt.state {
        AttemptState::Success => {
            warn!("\n🎯 EXECUTED {} ({})", attempt.pair, attempt.id);
            if let Some(tx_id) = &attempt.tx_id {
                warn!("   Tx: {}", tx_id);
            }
            if let Some(profit) = attempt.realized_profit_usd {
                warn!("   Realized: ${:.2}", profit);
            }
            if let Some(simulation) = &attempt.simulation {
                warn!("   Expected: ${:.2}", simulation.net_profit_usd);
                warn!(
                    "   Route: {} -> {}",
                    simulation.breakdown.buy_source, simulation.breakdown.sell_source
                );
            }
            warn!("   Completed in {}ms", attempt.completed_in_ms);
        }
        AttemptState::Failed => {
            warn!("\n💥 EXECUTION FAILED {} ({})", attempt.pair, attempt.id);
            if let Some(error) = &attempt.error {
                warn!("   Reason: {}", error);
            }
        }
        AttemptState::RejectedSpread => {
            if let (Some(observed), Some(required)) =
                (attempt.observed_spread_pct, attempt.required_spread_pct)
            {
                info!(
                    "📉 {} spread {:.3}% below required {:.3}%",
                    attempt.pair, observed, required
                );
            }
        }
        AttemptState::RejectedSimulation => {
            let reason = attempt
                .simulation
                .as_ref()
                .and_then(|s| s.reason.clone())
                .unwrap_or_else(|| "unspecified".to_string());
            info!("🔬 {} failed simulation: {}", attempt.pair, reason);
        }
        AttemptState::RejectedSafety => {
            let reason = attempt.safety_reason.as_deref().unwrap_or("unspecified");
            info!("🛑 {} blocked by safety pre-flight: {}", attempt.pair, reason);
        }
        AttemptState::Skipped => {
            if let Some(reason) = &attempt.safety_reason {
                info!("⏭️ {} skipped: {}", attempt.pair, reason);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn print_session_stats(
    start_time: Instant,
    cycles: u64,
    attempts: u64,
    executions: u64,
    successful_executions: u64,
    summary: &ScoreSummary,
    error_counts: &HashMap<String, u32>,
    circuit_breaker: &CircuitBreaker,
) {
    let runtime = start_time.elapsed().as_secs() / 60;

    info!("\n📊 Session Statistics ({} minutes)", runtime);
    info!("   🔁 MONITORING:");
    info!("     Cycles completed: {}", cycles);
    info!("     Attempts evaluated: {}", attempts);

    info!("   🚀 EXECUTION:");
    info!("     Executions: {}", executions);
    info!("     Successful: {}", successful_executions);
    info!(
        "     Success rate: {:.1}%",
        if executions > 0 {
            (successful_executions as f64 / executions as f64) * 100.0
        } else {
            0.0
        }
    );

    info!("   🧠 PAIR MEMORY:");
    info!("     Tracked pairs: {}", summary.total_pairs);
    info!(
        "     Lifetime record: {}W/{}L over {} attempt(s)",
        summary.total_wins, summary.total_losses, summary.total_attempts
    );
    info!("     Lifetime profit: ${:.2}", summary.total_profit_usd);

    info!("   ⚙️  SYSTEM:");
    info!(
        "     Circuit breaker: {}",
        if circuit_breaker.is_open().await {
            "OPEN"
        } else {
            "CLOSED"
        }
    );

    if !error_counts.is_empty() {
        info!("     Error summary:");
        for (error_type, count) in error_counts.iter() {
            info!("       {}: {}", error_type, count);
        }
    }

    info!("");
}

pub fn print_final_stats(start_time: Instant, summary: &ScoreSummary) {
    let runtime_mins = start_time.elapsed().as_secs() / 60;

    info!("\n🏁 Final Statistics");
    info!("   Runtime: {} minutes", runtime_mins);
    info!("   Tracked pairs: {}", summary.total_pairs);
    info!(
        "   Record: {}W/{}L ({:.1}% success)",
        summary.total_wins, summary.total_losses, summary.overall_success_rate_pct
    );
    info!("   Total profit: ${:.2}", summary.total_profit_usd);
    if let Some(best) = &summary.best_pair {
        info!("   Best pair: {}", best);
    }
    if let Some(worst) = &summary.worst_pair {
        info!("   Worst pair: {}", worst);
    }
}

pub fn print_integrity_report(report: &IntegrityReport) {
    match report.status {
        IntegrityStatus::Pass => info!("🛡️ Integrity: all execution-safety invariants hold"),
        IntegrityStatus::Warning => warn!("🛡️ Integrity: passed with warnings"),
        IntegrityStatus::CriticalFail => warn!("🛡️ Integrity: CRITICAL violations present"),
    }

    for violation in &report.violations {
        warn!(
            "   ⛔ [{}] {} -> {}",
            violation.kind, violation.message, violation.action
        );
    }
    for warning in &report.warnings {
        warn!(
            "   ⚠️ [{}] {} -> {}",
            warning.kind, warning.message, warning.action
        );
    }
}
