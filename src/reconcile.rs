//! Schema reconciliation: resolving which source column corresponds to
//! which target column.
//!
//! Given the two schema descriptors and the test's configuration, the
//! reconciler produces the final ordered [`ColumnPair`] list plus the
//! diagnostic sets (source-only, target-only, excluded, ambiguous). The
//! resolution order is:
//!
//! 1. Identity pairs for names present verbatim on both sides, in source
//!    declaration order.
//! 2. Explicit `column_mappings`, validated against both schemas; a mapping
//!    that references a missing column is discarded with an
//!    [`AmbiguousMappingWarning`] and never fails the test.
//! 3. Heuristic pairs for the remaining source-only columns, scored against
//!    the remaining target-only columns by a pluggable [`MatchScorer`].
//! 4. Exclusions, removing a column (by its own name, on whichever side it
//!    appears) from every pair and diagnostic set.
//!
//! The result is deterministic and reproducible for identical inputs.

use crate::config::ValidationConfig;
use crate::core::{
    AmbiguousMappingWarning, ColumnDescriptor, ColumnPair, CompareMode, DataKind, PairOrigin,
    ReconcileDiagnostics, SchemaDescriptor,
};
use std::collections::HashSet;
use std::fmt::Debug;
use tracing::{debug, instrument};

/// Minimum combined score below which no heuristic pair is created.
pub const MIN_HEURISTIC_SCORE: f64 = 0.6;

/// Scoring strategy for heuristic column matching.
///
/// The reconciler's control flow is fixed; only the score a candidate pair
/// receives is pluggable. Implementations return a value in `0.0..=1.0`.
pub trait MatchScorer: Debug + Send + Sync {
    /// Scores how likely `source` and `target` describe the same data.
    fn score(&self, source: &ColumnDescriptor, target: &ColumnDescriptor) -> f64;
}

/// Default scorer: tiered name similarity combined with declared-type
/// compatibility.
///
/// Name similarity tiers: case-insensitive exact (1.0) > prefix/suffix
/// (0.8) > substring (0.6) > none (0.0). Type affinity prefers matching
/// kinds (numeric-numeric, text-text, temporal-temporal); an unclassified
/// side scores half. The combined score weights name 3:1 over type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameTypeScorer;

impl NameTypeScorer {
    fn name_similarity(a: &str, b: &str) -> f64 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        if a == b {
            1.0
        } else if a.starts_with(&b) || b.starts_with(&a) || a.ends_with(&b) || b.ends_with(&a) {
            0.8
        } else if a.contains(&b) || b.contains(&a) {
            0.6
        } else {
            0.0
        }
    }

    fn type_affinity(a: DataKind, b: DataKind) -> f64 {
        if a == DataKind::Other || b == DataKind::Other {
            0.5
        } else if a == b {
            1.0
        } else {
            0.0
        }
    }
}

impl MatchScorer for NameTypeScorer {
    fn score(&self, source: &ColumnDescriptor, target: &ColumnDescriptor) -> f64 {
        let name = Self::name_similarity(&source.name, &target.name);
        if name == 0.0 {
            return 0.0;
        }
        let affinity = Self::type_affinity(source.kind(), target.kind());
        name * 0.75 + affinity * 0.25
    }
}

/// The reconciler's output: the ordered pair list and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledSchema {
    /// Identity pairs first (source order), then explicit (declaration
    /// order), then heuristic (source order).
    pub pairs: Vec<ColumnPair>,
    /// Diagnostic sets for reporting.
    pub diagnostics: ReconcileDiagnostics,
}

/// Resolves column correspondence between two schemas.
#[derive(Debug)]
pub struct SchemaReconciler {
    scorer: Box<dyn MatchScorer>,
}

impl Default for SchemaReconciler {
    fn default() -> Self {
        Self::new(NameTypeScorer)
    }
}

impl SchemaReconciler {
    /// Creates a reconciler with the given scoring strategy.
    pub fn new(scorer: impl MatchScorer + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
        }
    }

    /// Runs reconciliation for one source/target schema pair.
    #[instrument(skip(self, source, target, config), fields(
        source.table = %source.table,
        target.table = %target.table,
        source.columns = source.columns.len(),
        target.columns = target.columns.len(),
    ))]
    pub fn reconcile(
        &self,
        source: &SchemaDescriptor,
        target: &SchemaDescriptor,
        config: &ValidationConfig,
    ) -> ReconciledSchema {
        let mut diagnostics = ReconcileDiagnostics::default();
        let mut paired_source: HashSet<String> = HashSet::new();
        let mut paired_target: HashSet<String> = HashSet::new();

        // Explicit mappings always take precedence, so reserve their ends
        // before identity pairing.
        let mut valid_mappings = Vec::new();
        for mapping in &config.column_mappings {
            if !source.has_column(&mapping.source_column) {
                diagnostics.ambiguous.push(AmbiguousMappingWarning {
                    column: mapping.source_column.clone(),
                    reason: format!(
                        "mapped source column '{}' does not exist in {}",
                        mapping.source_column, source.table
                    ),
                });
                continue;
            }
            if !target.has_column(&mapping.target_column) {
                diagnostics.ambiguous.push(AmbiguousMappingWarning {
                    column: mapping.target_column.clone(),
                    reason: format!(
                        "mapped target column '{}' does not exist in {}",
                        mapping.target_column, target.table
                    ),
                });
                continue;
            }
            paired_source.insert(mapping.source_column.clone());
            paired_target.insert(mapping.target_column.clone());
            valid_mappings.push(mapping.clone());
        }

        // Step 1: identity pairs for verbatim-common names, source order.
        let target_names: HashSet<&str> = target.column_names().collect();
        let mut identity_pairs = Vec::new();
        for column in &source.columns {
            if target_names.contains(column.name.as_str())
                && !paired_source.contains(&column.name)
                && !paired_target.contains(&column.name)
            {
                paired_source.insert(column.name.clone());
                paired_target.insert(column.name.clone());
                identity_pairs.push(ColumnPair::new(
                    column.name.clone(),
                    column.name.clone(),
                    PairOrigin::Identity,
                ));
            }
        }

        // Step 2: explicit pairs in declaration order.
        let explicit_pairs: Vec<ColumnPair> = valid_mappings
            .iter()
            .map(|m| {
                ColumnPair::new(
                    m.source_column.clone(),
                    m.target_column.clone(),
                    PairOrigin::Explicit,
                )
            })
            .collect();

        // Step 3: heuristic matching of the remaining source-only columns
        // against the remaining target-only columns.
        let excluded: HashSet<&str> = config.exclude_columns.iter().map(String::as_str).collect();
        let mut candidates: Vec<&ColumnDescriptor> = target
            .columns
            .iter()
            .filter(|c| !paired_target.contains(&c.name) && !excluded.contains(c.name.as_str()))
            .collect();

        let mut heuristic_pairs = Vec::new();
        for column in &source.columns {
            if paired_source.contains(&column.name) || excluded.contains(column.name.as_str()) {
                continue;
            }

            let mut best: Option<(f64, &ColumnDescriptor)> = None;
            for candidate in &candidates {
                let score = self.scorer.score(column, candidate);
                let better = match best {
                    None => true,
                    // Ties break by lexicographically smallest target name.
                    Some((best_score, best_candidate)) => {
                        score > best_score
                            || (score == best_score && candidate.name < best_candidate.name)
                    }
                };
                if better {
                    best = Some((score, candidate));
                }
            }

            match best {
                Some((score, candidate)) if score >= MIN_HEURISTIC_SCORE => {
                    debug!(
                        source.column = %column.name,
                        target.column = %candidate.name,
                        score,
                        "Heuristic column pair accepted"
                    );
                    let target_name = candidate.name.clone();
                    candidates.retain(|c| c.name != target_name);
                    paired_source.insert(column.name.clone());
                    paired_target.insert(target_name.clone());
                    heuristic_pairs.push(ColumnPair::new(
                        column.name.clone(),
                        target_name,
                        PairOrigin::Heuristic,
                    ));
                }
                Some((score, _)) if score > 0.0 => {
                    diagnostics.ambiguous.push(AmbiguousMappingWarning {
                        column: column.name.clone(),
                        reason: format!(
                            "no target candidate scored above the confidence floor \
                             (best {score:.2})"
                        ),
                    });
                }
                _ => {}
            }
        }

        // Step 4: exclusions strip columns from every pair and "only" set.
        let mut pairs: Vec<ColumnPair> = identity_pairs
            .into_iter()
            .chain(explicit_pairs)
            .chain(heuristic_pairs)
            .filter(|p| {
                !excluded.contains(p.source_column.as_str())
                    && !excluded.contains(p.target_column.as_str())
            })
            .collect();

        for pair in &mut pairs {
            pair.mode = compare_mode_for(&pair.source_column, config);
        }

        let in_pairs_source: HashSet<&str> =
            pairs.iter().map(|p| p.source_column.as_str()).collect();
        let in_pairs_target: HashSet<&str> =
            pairs.iter().map(|p| p.target_column.as_str()).collect();

        for column in &source.columns {
            if excluded.contains(column.name.as_str()) {
                if !diagnostics.excluded.contains(&column.name) {
                    diagnostics.excluded.push(column.name.clone());
                }
            } else if !in_pairs_source.contains(column.name.as_str()) {
                diagnostics.source_only.push(column.name.clone());
            }
        }
        for column in &target.columns {
            if excluded.contains(column.name.as_str()) {
                if !diagnostics.excluded.contains(&column.name) {
                    diagnostics.excluded.push(column.name.clone());
                }
            } else if !in_pairs_target.contains(column.name.as_str()) {
                diagnostics.target_only.push(column.name.clone());
            }
        }

        debug!(
            pairs = pairs.len(),
            source_only = diagnostics.source_only.len(),
            target_only = diagnostics.target_only.len(),
            ambiguous = diagnostics.ambiguous.len(),
            "Schema reconciliation complete"
        );

        ReconciledSchema { pairs, diagnostics }
    }
}

fn compare_mode_for(source_column: &str, config: &ValidationConfig) -> CompareMode {
    if config.expect_cols.iter().any(|c| c == source_column) {
        CompareMode::ExpectDrift
    } else if config.compare_columns.iter().any(|c| c == source_column) {
        CompareMode::Strict
    } else {
        CompareMode::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColumnDescriptor;

    fn schema(table: &str, columns: &[(&str, &str)]) -> SchemaDescriptor {
        SchemaDescriptor::new(
            table,
            columns
                .iter()
                .map(|(name, ty)| ColumnDescriptor::new(*name, *ty, true))
                .collect(),
        )
    }

    fn reconcile(
        source: &SchemaDescriptor,
        target: &SchemaDescriptor,
        params: &str,
    ) -> ReconciledSchema {
        let config = ValidationConfig::parse(params).unwrap();
        SchemaReconciler::default().reconcile(source, target, &config)
    }

    #[test]
    fn test_identity_pairs_in_source_order() {
        let source = schema("s", &[("id", "BIGINT"), ("name", "TEXT"), ("price", "NUMERIC")]);
        let target = schema("t", &[("price", "NUMERIC"), ("id", "BIGINT"), ("name", "TEXT")]);
        let result = reconcile(&source, &target, "");

        let names: Vec<&str> = result.pairs.iter().map(|p| p.source_column.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "price"]);
        assert!(result.pairs.iter().all(|p| p.origin == PairOrigin::Identity));
        assert!(result.diagnostics.source_only.is_empty());
        assert!(result.diagnostics.target_only.is_empty());
    }

    #[test]
    fn test_explicit_mapping_takes_precedence() {
        let source = schema("s", &[("id", "BIGINT"), ("cost_price", "NUMERIC")]);
        let target = schema("t", &[("id", "BIGINT"), ("price", "NUMERIC")]);
        let result = reconcile(&source, &target, "column_mappings=cost_price=price");

        assert_eq!(result.pairs.len(), 2);
        assert_eq!(result.pairs[0].origin, PairOrigin::Identity);
        assert_eq!(result.pairs[1].origin, PairOrigin::Explicit);
        assert_eq!(result.pairs[1].source_column, "cost_price");
        assert_eq!(result.pairs[1].target_column, "price");
        assert!(result.diagnostics.source_only.is_empty());
    }

    #[test]
    fn test_invalid_mapping_discarded_with_warning() {
        let source = schema("s", &[("id", "BIGINT")]);
        let target = schema("t", &[("id", "BIGINT"), ("price", "NUMERIC")]);
        let result = reconcile(&source, &target, "column_mappings=ghost=price");

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.diagnostics.ambiguous.len(), 1);
        assert_eq!(result.diagnostics.ambiguous[0].column, "ghost");
        // The dangling target end stays a target-only diagnostic.
        assert_eq!(result.diagnostics.target_only, vec!["price".to_string()]);
    }

    #[test]
    fn test_heuristic_match_by_name_and_type() {
        let source = schema("s", &[("id", "BIGINT"), ("total_amount", "NUMERIC")]);
        let target = schema("t", &[("id", "BIGINT"), ("amount", "NUMERIC")]);
        let result = reconcile(&source, &target, "");

        assert_eq!(result.pairs.len(), 2);
        assert_eq!(result.pairs[1].origin, PairOrigin::Heuristic);
        assert_eq!(result.pairs[1].source_column, "total_amount");
        assert_eq!(result.pairs[1].target_column, "amount");
    }

    #[test]
    fn test_heuristic_tie_breaks_lexicographically() {
        // Both targets score identically against "value"; "value_a" wins
        // the tie by name order.
        let source = schema("s", &[("value", "NUMERIC")]);
        let target = schema("t", &[("value_b", "NUMERIC"), ("value_a", "NUMERIC")]);
        let result = reconcile(&source, &target, "");

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].target_column, "value_a");
    }

    #[test]
    fn test_low_score_leaves_source_only() {
        let source = schema("s", &[("zzz_internal", "NUMERIC")]);
        let target = schema("t", &[("customer_email", "TEXT")]);
        let result = reconcile(&source, &target, "");

        assert!(result.pairs.is_empty());
        assert_eq!(result.diagnostics.source_only, vec!["zzz_internal".to_string()]);
        assert_eq!(result.diagnostics.target_only, vec!["customer_email".to_string()]);
    }

    #[test]
    fn test_exclusion_removes_from_all_sets() {
        // Source-only column c: after exclusion no diagnostic mentions it.
        let source = schema("s", &[("id", "BIGINT"), ("c", "NUMERIC")]);
        let target = schema("t", &[("id", "BIGINT")]);
        let result = reconcile(&source, &target, "exclude_columns=c");

        assert_eq!(result.pairs.len(), 1);
        assert!(result.diagnostics.source_only.is_empty());
        assert_eq!(result.diagnostics.excluded, vec!["c".to_string()]);
        assert!(result
            .diagnostics
            .ambiguous
            .iter()
            .all(|w| w.column != "c"));
    }

    #[test]
    fn test_exclusion_removes_identity_pair() {
        let source = schema("s", &[("id", "BIGINT"), ("created_date", "TIMESTAMP")]);
        let target = schema("t", &[("id", "BIGINT"), ("created_date", "TIMESTAMP")]);
        let result = reconcile(&source, &target, "exclude_columns=created_date");

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].source_column, "id");
    }

    #[test]
    fn test_compare_mode_assignment() {
        let source = schema("s", &[("id", "BIGINT"), ("salary", "NUMERIC"), ("updated_at", "TIMESTAMP")]);
        let target = schema("t", &[("id", "BIGINT"), ("salary", "NUMERIC"), ("updated_at", "TIMESTAMP")]);
        let result = reconcile(
            &source,
            &target,
            "compare_columns=salary,expect_cols=updated_at",
        );

        let mode_of = |name: &str| {
            result
                .pairs
                .iter()
                .find(|p| p.source_column == name)
                .unwrap()
                .mode
        };
        assert_eq!(mode_of("id"), CompareMode::Default);
        assert_eq!(mode_of("salary"), CompareMode::Strict);
        assert_eq!(mode_of("updated_at"), CompareMode::ExpectDrift);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let source = schema(
            "s",
            &[("id", "BIGINT"), ("total_amount", "NUMERIC"), ("descr", "TEXT")],
        );
        let target = schema(
            "t",
            &[("id", "BIGINT"), ("amount", "NUMERIC"), ("description", "TEXT")],
        );
        let first = reconcile(&source, &target, "");
        let second = reconcile(&source, &target, "");
        assert_eq!(first, second);
    }
}
