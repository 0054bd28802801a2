//! Result types produced by a validation run.
//!
//! Everything a reporting collaborator needs lives here: the overall
//! status, the row-count finding, per-column findings with bounded
//! mismatch samples, and the reconciliation diagnostics. All types are
//! plain data, produced once per execution and never mutated afterward.

use super::value::{DataKind, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The overall status of one validation execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    /// No tolerance or threshold violations at all.
    Pass,
    /// Soft violations only.
    Warn,
    /// At least one hard violation.
    Fail,
}

impl OverallStatus {
    /// Returns true if this is a passing status.
    pub fn is_pass(&self) -> bool {
        matches!(self, OverallStatus::Pass)
    }

    /// Returns true if this is a failing status.
    pub fn is_fail(&self) -> bool {
        matches!(self, OverallStatus::Fail)
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverallStatus::Pass => "PASS",
            OverallStatus::Warn => "WARN",
            OverallStatus::Fail => "FAIL",
        };
        write!(f, "{name}")
    }
}

/// The verdict for a single check (row count or one column pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// The check met its threshold/tolerance.
    Ok,
    /// The check fell below its threshold or outside its tolerance.
    BelowThreshold,
    /// Nothing to evaluate (empty sample).
    Skipped,
}

/// Severity of a tolerance or threshold violation.
///
/// A hard violation forces the overall outcome to [`OverallStatus::Fail`];
/// a soft violation is recorded as a warning and only degrades the outcome
/// to [`OverallStatus::Warn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Violations force overall FAIL.
    Hard,
    /// Violations are recorded as warnings.
    Soft,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hard => write!(f, "hard"),
            Severity::Soft => write!(f, "soft"),
        }
    }
}

/// How a column pair was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairOrigin {
    /// Same name on both sides, no mapping needed.
    Identity,
    /// User-declared mapping.
    Explicit,
    /// Inferred by the match scorer.
    Heuristic,
}

/// How a column pair is evaluated by the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// Tolerance-based equality judged against the per-kind threshold.
    Default,
    /// Listed in `compare_columns`: zero out-of-tolerance samples allowed.
    Strict,
    /// Listed in `expect_cols`: values are expected to differ; only the
    /// difference staying within tolerance is judged.
    ExpectDrift,
}

/// A resolved correspondence between a source and a target column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    /// Column name on the source side.
    pub source_column: String,
    /// Column name on the target side.
    pub target_column: String,
    /// How the pair was resolved.
    pub origin: PairOrigin,
    /// How the pair is evaluated.
    pub mode: CompareMode,
}

impl ColumnPair {
    /// Creates a pair with [`CompareMode::Default`].
    pub fn new(
        source_column: impl Into<String>,
        target_column: impl Into<String>,
        origin: PairOrigin,
    ) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            origin,
            mode: CompareMode::Default,
        }
    }

    /// Sets the compare mode.
    pub fn with_mode(mut self, mode: CompareMode) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_column, self.target_column)
    }
}

/// One sampled value disagreement, kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchSample {
    /// The key of the row (when a key column was declared) or its position.
    pub row_key: Value,
    /// The value on the source side.
    pub source_value: Value,
    /// The value on the target side.
    pub target_value: Value,
}

/// The raw comparison statistics for one column pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The pair that was compared.
    pub pair: ColumnPair,
    /// How many row pairs were sampled.
    pub sample_size: usize,
    /// How many sampled pairs were equal within tolerance.
    pub match_count: usize,
    /// Bounded set of mismatch examples.
    pub mismatch_samples: Vec<MismatchSample>,
    /// The comparison kind the tolerance engine used.
    pub inferred_kind: DataKind,
}

impl ComparisonResult {
    /// The fraction of sampled pairs judged equal, or `None` when nothing
    /// was sampled.
    pub fn match_rate(&self) -> Option<f64> {
        if self.sample_size == 0 {
            None
        } else {
            Some(self.match_count as f64 / self.sample_size as f64)
        }
    }
}

/// The row-count check finding, always evaluated once per execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCountFinding {
    /// Total rows on the source side.
    pub source_count: u64,
    /// Total rows on the target side.
    pub target_count: u64,
    /// Whether the counts were within the configured tolerance.
    pub verdict: VerdictStatus,
    /// Severity the finding carries.
    pub severity: Severity,
    /// Human-oriented detail, produced as data for external rendering.
    pub detail: String,
}

/// The per-column verdict derived from a [`ComparisonResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFinding {
    /// The underlying comparison statistics.
    pub result: ComparisonResult,
    /// The match rate, `None` when nothing was sampled.
    pub match_rate: Option<f64>,
    /// The threshold the rate was judged against.
    pub threshold: f64,
    /// The verdict.
    pub verdict: VerdictStatus,
    /// Severity the finding carries.
    pub severity: Severity,
}

/// A column that could not be confidently mapped, or a declared mapping
/// that references a column absent from its schema.
///
/// Diagnostics never fail a test by themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousMappingWarning {
    /// The column the diagnostic refers to.
    pub column: String,
    /// Why the mapping could not be resolved.
    pub reason: String,
}

/// Diagnostic sets produced by schema reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileDiagnostics {
    /// Columns present only on the source side after reconciliation.
    pub source_only: Vec<String>,
    /// Columns present only on the target side after reconciliation.
    pub target_only: Vec<String>,
    /// Columns removed from consideration by `exclude_columns`.
    pub excluded: Vec<String>,
    /// Mappings that could not be confidently resolved.
    pub ambiguous: Vec<AmbiguousMappingWarning>,
}

/// One validation execution's complete outcome.
///
/// Suitable for direct serialization by a reporting collaborator; the
/// engine performs no formatting itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Overall status of the execution.
    pub overall_status: OverallStatus,
    /// The row-count check finding.
    pub row_count_finding: RowCountFinding,
    /// Per-column findings in resolved pair order.
    pub column_findings: Vec<ColumnFinding>,
    /// Descriptions of hard violations, in finding order.
    pub hard_failures: Vec<String>,
    /// Descriptions of soft violations, in finding order.
    pub soft_warnings: Vec<String>,
    /// Reconciliation diagnostics (source-only/target-only/excluded/ambiguous).
    pub diagnostics: ReconcileDiagnostics,
    /// Configuration warnings (unknown keys and the like).
    pub config_warnings: Vec<String>,
    /// Wall-clock time the execution took, in milliseconds.
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_status_display() {
        assert_eq!(OverallStatus::Pass.to_string(), "PASS");
        assert_eq!(OverallStatus::Warn.to_string(), "WARN");
        assert_eq!(OverallStatus::Fail.to_string(), "FAIL");
        assert!(OverallStatus::Pass.is_pass());
        assert!(OverallStatus::Fail.is_fail());
    }

    #[test]
    fn test_match_rate() {
        let result = ComparisonResult {
            pair: ColumnPair::new("a", "a", PairOrigin::Identity),
            sample_size: 10,
            match_count: 9,
            mismatch_samples: vec![],
            inferred_kind: DataKind::Numeric,
        };
        assert_eq!(result.match_rate(), Some(0.9));

        let empty = ComparisonResult {
            sample_size: 0,
            match_count: 0,
            ..result
        };
        assert_eq!(empty.match_rate(), None);
    }

    #[test]
    fn test_outcome_serializes() {
        let outcome = ValidationOutcome {
            overall_status: OverallStatus::Warn,
            row_count_finding: RowCountFinding {
                source_count: 1000,
                target_count: 990,
                verdict: VerdictStatus::Ok,
                severity: Severity::Soft,
                detail: "within 2% tolerance".to_string(),
            },
            column_findings: vec![],
            hard_failures: vec![],
            soft_warnings: vec!["column price below threshold".to_string()],
            diagnostics: ReconcileDiagnostics::default(),
            config_warnings: vec![],
            elapsed_ms: 12,
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["overall_status"], "WARN");
        assert_eq!(json["row_count_finding"]["verdict"], "ok");
    }
}
