//! Outcome aggregation: match-rate thresholds and hard/soft severity
//! resolution.
//!
//! The aggregator turns raw comparison statistics into per-column verdicts
//! and the single overall status. Checks are never short-circuited; every
//! finding is recorded so reporting is complete, and only then does
//! severity resolution decide the overall status: hard violations force
//! `FAIL`, soft violations alone yield `WARN`, and `PASS` requires zero
//! violations. Ambiguous-mapping diagnostics never fail a test by
//! themselves.

use crate::config::ValidationConfig;
use crate::core::{
    ColumnFinding, CompareMode, ComparisonResult, OverallStatus, ReconcileDiagnostics,
    RowCountFinding, Severity, ValidationOutcome, VerdictStatus,
};
use tracing::{debug, warn};

/// Resolves verdicts and the overall status for one test execution.
#[derive(Debug)]
pub struct OutcomeAggregator<'a> {
    config: &'a ValidationConfig,
}

impl<'a> OutcomeAggregator<'a> {
    /// Creates an aggregator for a test case's configuration.
    pub fn new(config: &'a ValidationConfig) -> Self {
        Self { config }
    }

    /// The threshold governing one comparison result.
    ///
    /// `compare_columns` pairs tolerate zero out-of-tolerance samples;
    /// everything else uses the per-kind threshold.
    fn threshold_for(&self, result: &ComparisonResult) -> f64 {
        match result.pair.mode {
            CompareMode::Strict => 1.0,
            _ => self.config.thresholds.for_kind(result.inferred_kind),
        }
    }

    /// Derives the per-column verdict for one comparison result.
    pub fn verdict(&self, result: ComparisonResult) -> ColumnFinding {
        let threshold = self.threshold_for(&result);
        let match_rate = result.match_rate();
        let verdict = match match_rate {
            None => VerdictStatus::Skipped,
            Some(rate) if rate >= threshold => VerdictStatus::Ok,
            Some(_) => VerdictStatus::BelowThreshold,
        };

        ColumnFinding {
            result,
            match_rate,
            threshold,
            verdict,
            severity: self.config.validation_type,
        }
    }

    /// Combines all findings into the single [`ValidationOutcome`].
    pub fn aggregate(
        &self,
        row_count_finding: RowCountFinding,
        results: Vec<ComparisonResult>,
        diagnostics: ReconcileDiagnostics,
        elapsed_ms: u64,
    ) -> ValidationOutcome {
        let column_findings: Vec<ColumnFinding> =
            results.into_iter().map(|r| self.verdict(r)).collect();

        let mut hard_failures = Vec::new();
        let mut soft_warnings = Vec::new();

        if row_count_finding.verdict == VerdictStatus::BelowThreshold {
            let description = format!("row count: {}", row_count_finding.detail);
            match row_count_finding.severity {
                Severity::Hard => hard_failures.push(description),
                Severity::Soft => soft_warnings.push(description),
            }
        }

        for finding in &column_findings {
            if finding.verdict != VerdictStatus::BelowThreshold {
                continue;
            }
            let rate = finding.match_rate.unwrap_or(0.0);
            let description = format!(
                "column {}: match rate {:.1}% below threshold {:.1}%",
                finding.result.pair,
                rate * 100.0,
                finding.threshold * 100.0
            );
            match finding.severity {
                Severity::Hard => hard_failures.push(description),
                Severity::Soft => soft_warnings.push(description),
            }
        }

        let overall_status = if !hard_failures.is_empty() {
            OverallStatus::Fail
        } else if !soft_warnings.is_empty() {
            OverallStatus::Warn
        } else {
            OverallStatus::Pass
        };

        if overall_status == OverallStatus::Fail {
            warn!(
                hard_failures = hard_failures.len(),
                soft_warnings = soft_warnings.len(),
                "Validation failed"
            );
        } else {
            debug!(
                status = %overall_status,
                soft_warnings = soft_warnings.len(),
                "Validation aggregated"
            );
        }

        ValidationOutcome {
            overall_status,
            row_count_finding,
            column_findings,
            hard_failures,
            soft_warnings,
            diagnostics,
            config_warnings: self.config.warnings.clone(),
            elapsed_ms,
        }
    }
}
