//! Execution-safety audit over the running configuration
//!
//! Evaluates boolean invariants on the loaded [`Config`] before the
//! monitoring loop is allowed to start. Critical findings (simulation
//! bypass, queued execution, standing approvals, an ungated forced
//! override) refuse startup; a zero-fee-gated override only warns.

use tracing::{info, warn};

use crate::config::Config;
use crate::types::{FindingSeverity, IntegrityFinding, IntegrityReport, IntegrityStatus};
use rust_decimal_macros::dec;

/// Names of the safety features the checklist expects to be active.
const SAFETY_CHECKLIST_LEN: usize = 6;

pub struct IntegrityGuard;

impl IntegrityGuard {
    pub fn check(config: &Config) -> IntegrityReport {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if config.bypass_simulation {
            violations.push(IntegrityFinding {
                kind: "NO_SIMULATION".to_string(),
                severity: FindingSeverity::Critical,
                message: "trade simulation is bypassed; every candidate would execute unvetted"
                    .to_string(),
                action: "unset BYPASS_SIMULATION".to_string(),
            });
        }

        if config.queued_execution {
            violations.push(IntegrityFinding {
                kind: "QUEUE_EXECUTION".to_string(),
                severity: FindingSeverity::Critical,
                message: "queued execution defers trades past their validated snapshot"
                    .to_string(),
                action: "unset QUEUED_EXECUTION".to_string(),
            });
        }

        if !config.standing_approvals.is_empty() {
            violations.push(IntegrityFinding {
                kind: "PRE_APPROVAL".to_string(),
                severity: FindingSeverity::Critical,
                message: format!(
                    "{} standing approval(s) would authorize trades without per-attempt review",
                    config.standing_approvals.len()
                ),
                action: "clear STANDING_APPROVALS".to_string(),
            });
        }

        if config.force_execute {
            if config.force_execute_zero_fee_only {
                warnings.push(IntegrityFinding {
                    kind: "CONDITIONAL_OVERRIDE".to_string(),
                    severity: FindingSeverity::Warning,
                    message: "forced execution is enabled but gated to zero-fee loans"
                        .to_string(),
                    action: "prefer unsetting FORCE_EXECUTE".to_string(),
                });
            } else {
                violations.push(IntegrityFinding {
                    kind: "FORCED_OVERRIDE".to_string(),
                    severity: FindingSeverity::Critical,
                    message: "forced execution without the zero-fee gate overrides every check"
                        .to_string(),
                    action: "unset FORCE_EXECUTE or keep FORCE_EXECUTE_ZERO_FEE_ONLY".to_string(),
                });
            }
        }

        let enabled = enabled_safety_features(config);
        if enabled.len() < SAFETY_CHECKLIST_LEN.div_ceil(2) {
            violations.push(IntegrityFinding {
                kind: "INSUFFICIENT_SAFETY".to_string(),
                severity: FindingSeverity::High,
                message: format!(
                    "only {}/{} safety features active: {}",
                    enabled.len(),
                    SAFETY_CHECKLIST_LEN,
                    enabled.join(", ")
                ),
                action: "re-enable the disabled safety features".to_string(),
            });
        }

        let status = if !violations.is_empty() {
            IntegrityStatus::CriticalFail
        } else if !warnings.is_empty() {
            IntegrityStatus::Warning
        } else {
            IntegrityStatus::Pass
        };

        match status {
            IntegrityStatus::Pass => info!("🛡️ Integrity check passed"),
            IntegrityStatus::Warning => {
                warn!("🛡️ Integrity check passed with {} warning(s)", warnings.len())
            }
            IntegrityStatus::CriticalFail => warn!(
                "🛡️ Integrity check FAILED with {} violation(s)",
                violations.len()
            ),
        }

        IntegrityReport {
            status,
            violations,
            warnings,
            checked_at: chrono::Utc::now(),
        }
    }
}

/// The subset of the safety checklist currently active.
fn enabled_safety_features(config: &Config) -> Vec<String> {
    let checklist: [(&str, bool); SAFETY_CHECKLIST_LEN] = [
        ("spread gate", !config.force_execute),
        ("trade simulation", !config.bypass_simulation),
        ("safety buffer", config.safety_buffer > dec!(0)),
        ("gas price cap", config.max_gas_price_gwei > 0),
        ("circuit breaker", config.max_failed_attempts > 0),
        (
            "risk scoring",
            config.risk_threshold > dec!(0) && config.risk_threshold <= dec!(100),
        ),
    ];

    checklist
        .into_iter()
        .filter(|(_, active)| *active)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe_config() -> Config {
        Config {
            monitored_pairs: vec!["ETH/USDC".to_string()],
            trade_size_eth: dec!(1),
            monitoring_interval_ms: 12_000,
            safety_buffer: dec!(0.02),
            min_success_rate: dec!(0.95),
            max_failed_attempts: 5,
            max_gas_price_gwei: 200,
            risk_threshold: dec!(70),
            max_concurrent_executions: 2,
            execution_timeout_secs: 30,
            quote_cache_ttl_secs: 10,
            quote_timeout_ms: 2_000,
            score_retention_days: 30,
            score_file: "output/memory/pair_scores.json".to_string(),
            max_consecutive_errors: 5,
            circuit_breaker_cooldown_secs: 300,
            integrity_recheck_cycles: None,
            price_sources: Vec::new(),
            gas_oracle_url: None,
            gas_oracle_api_key: None,
            bypass_simulation: false,
            queued_execution: false,
            standing_approvals: Vec::new(),
            force_execute: false,
            force_execute_zero_fee_only: true,
        }
    }

    #[test]
    fn clean_config_passes() {
        let report = IntegrityGuard::check(&safe_config());
        assert_eq!(report.status, IntegrityStatus::Pass);
        assert!(report.violations.is_empty());
        assert!(report.warnings.is_empty());
        assert!(!report.is_critical());
    }

    #[test]
    fn simulation_bypass_is_critical() {
        let mut config = safe_config();
        config.bypass_simulation = true;

        let report = IntegrityGuard::check(&config);
        assert!(report.is_critical());
        assert!(report.violations.iter().any(|v| v.kind == "NO_SIMULATION"));
    }

    #[test]
    fn queued_execution_is_critical() {
        let mut config = safe_config();
        config.queued_execution = true;

        let report = IntegrityGuard::check(&config);
        assert!(report.is_critical());
        assert!(report.violations.iter().any(|v| v.kind == "QUEUE_EXECUTION"));
    }

    #[test]
    fn standing_approvals_are_critical() {
        let mut config = safe_config();
        config.standing_approvals = vec!["0xabc".to_string()];

        let report = IntegrityGuard::check(&config);
        assert!(report.is_critical());
        assert!(report.violations.iter().any(|v| v.kind == "PRE_APPROVAL"));
    }

    #[test]
    fn ungated_forced_override_is_critical() {
        let mut config = safe_config();
        config.force_execute = true;
        config.force_execute_zero_fee_only = false;

        let report = IntegrityGuard::check(&config);
        assert!(report.is_critical());
        assert!(report.violations.iter().any(|v| v.kind == "FORCED_OVERRIDE"));
    }

    #[test]
    fn zero_fee_gated_override_only_warns() {
        let mut config = safe_config();
        config.force_execute = true;
        config.force_execute_zero_fee_only = true;

        let report = IntegrityGuard::check(&config);
        assert_eq!(report.status, IntegrityStatus::Warning);
        assert!(report.violations.is_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == "CONDITIONAL_OVERRIDE"));
    }

    #[test]
    fn disabling_most_safety_features_is_flagged() {
        let mut config = safe_config();
        config.safety_buffer = dec!(0);
        config.max_gas_price_gwei = 0;
        config.risk_threshold = dec!(0);
        config.bypass_simulation = true;

        let report = IntegrityGuard::check(&config);
        assert!(report.is_critical());
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == "INSUFFICIENT_SAFETY"));
    }
}
