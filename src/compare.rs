//! Row-set comparison: the row-count check and per-column value checks.
//!
//! Both checks consume data through the [`DataSampling`] collaborator and
//! the tolerance engine; neither renders anything. The row-count check is
//! always evaluated once per test. Column-value checks sample up to the
//! configured batch size of rows per side, align them by the declared key
//! column (or by stable positional order), and evaluate every value pair,
//! producing per-column match statistics with a bounded list of mismatch
//! examples.

use crate::config::ValidationConfig;
use crate::core::{
    ColumnPair, CompareMode, ComparisonResult, DataKind, MismatchSample, RowCountFinding,
    SchemaDescriptor, Value, VerdictStatus,
};
use crate::error::Result;
use crate::sources::{DataSampling, SampleRow};
use crate::tolerance::ToleranceEngine;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Upper bound on retained mismatch examples per column pair.
pub const MISMATCH_SAMPLE_CAP: usize = 10;

/// Applies the row-count and column-value checks for one test case.
#[derive(Debug)]
pub struct RowSetComparator<'a> {
    config: &'a ValidationConfig,
    engine: ToleranceEngine,
}

impl<'a> RowSetComparator<'a> {
    /// Creates a comparator for a test case's configuration.
    pub fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            engine: ToleranceEngine::from_config(config),
        }
    }

    /// Compares total row counts under the numeric tolerance rules.
    #[instrument(skip(self, sampler), fields(
        source.table = %self.config.source_table,
        target.table = %self.config.target_table,
    ))]
    pub async fn row_count_check(&self, sampler: &dyn DataSampling) -> Result<RowCountFinding> {
        let (source_count, target_count) = futures::try_join!(
            sampler.count_rows(&self.config.source_table, self.config.source_where.as_deref()),
            sampler.count_rows(&self.config.target_table, self.config.target_where.as_deref()),
        )?;

        // The row-count check uses the base tolerance, never the
        // float_tolerance column override, and no decimal rounding.
        let comparator =
            crate::tolerance::NumericComparator::new(self.config.tolerance, None);
        let evaluation = comparator.evaluate(source_count as f64, target_count as f64);

        let (verdict, detail) = if evaluation.equal {
            (
                VerdictStatus::Ok,
                format!("row counts within tolerance: {source_count} vs {target_count}"),
            )
        } else {
            (
                VerdictStatus::BelowThreshold,
                evaluation
                    .detail
                    .unwrap_or_else(|| format!("row counts differ: {source_count} vs {target_count}")),
            )
        };

        debug!(
            source.count = source_count,
            target.count = target_count,
            verdict = ?verdict,
            "Row count check complete"
        );

        Ok(RowCountFinding {
            source_count,
            target_count,
            verdict,
            severity: self.config.tolerance.severity,
            detail,
        })
    }

    /// Runs the column-value check for every selected pair.
    ///
    /// When `compare_columns` or `expect_cols` name any columns, only the
    /// named pairs are compared; otherwise all resolved pairs are. Rows are
    /// aligned by key value when a key column is declared (rows present on
    /// one side only are left to the row-count check), else positionally.
    #[instrument(skip_all, fields(pairs = pairs.len()))]
    pub async fn column_checks(
        &self,
        sampler: &dyn DataSampling,
        source_schema: &SchemaDescriptor,
        target_schema: &SchemaDescriptor,
        pairs: &[ColumnPair],
    ) -> Result<Vec<ComparisonResult>> {
        let selected: Vec<&ColumnPair> = if self.has_selection() {
            pairs.iter().filter(|p| p.mode != CompareMode::Default).collect()
        } else {
            pairs.iter().collect()
        };
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let source_columns: Vec<String> =
            selected.iter().map(|p| p.source_column.clone()).collect();
        let target_columns: Vec<String> =
            selected.iter().map(|p| p.target_column.clone()).collect();
        let key = self.config.key_column.as_deref();

        let (source_rows, target_rows) = futures::try_join!(
            sampler.fetch_sample(
                &self.config.source_table,
                &source_columns,
                self.config.sample_size,
                key,
                self.config.source_where.as_deref(),
            ),
            sampler.fetch_sample(
                &self.config.target_table,
                &target_columns,
                self.config.sample_size,
                key,
                self.config.target_where.as_deref(),
            ),
        )?;

        let aligned = align_rows(&source_rows, &target_rows, key.is_some());

        let mut results = Vec::with_capacity(selected.len());
        for (index, pair) in selected.iter().enumerate() {
            results.push(self.compare_pair(
                pair,
                index,
                &aligned,
                source_schema,
                target_schema,
            ));
        }
        Ok(results)
    }

    fn has_selection(&self) -> bool {
        !self.config.compare_columns.is_empty() || !self.config.expect_cols.is_empty()
    }

    fn compare_pair(
        &self,
        pair: &ColumnPair,
        column_index: usize,
        aligned: &[AlignedRow<'_>],
        source_schema: &SchemaDescriptor,
        target_schema: &SchemaDescriptor,
    ) -> ComparisonResult {
        let inferred_kind = infer_pair_kind(pair, source_schema, target_schema);

        let mut match_count = 0;
        let mut mismatch_samples = Vec::new();
        for row in aligned {
            let source_value = &row.source.values[column_index];
            let target_value = &row.target.values[column_index];
            let evaluation = self.engine.evaluate(source_value, target_value);
            if evaluation.equal {
                match_count += 1;
            } else if mismatch_samples.len() < MISMATCH_SAMPLE_CAP {
                mismatch_samples.push(MismatchSample {
                    row_key: row.key.clone(),
                    source_value: source_value.clone(),
                    target_value: target_value.clone(),
                });
            }
        }

        debug!(
            pair = %pair,
            kind = %inferred_kind,
            sample_size = aligned.len(),
            match_count,
            "Column value check complete"
        );

        ComparisonResult {
            pair: (*pair).clone(),
            sample_size: aligned.len(),
            match_count,
            mismatch_samples,
            inferred_kind,
        }
    }
}

struct AlignedRow<'r> {
    key: Value,
    source: &'r SampleRow,
    target: &'r SampleRow,
}

/// Pairs up sampled rows: by key value when keyed, else positionally.
/// Keyed rows without a counterpart on the other side are dropped here;
/// volume disagreement belongs to the row-count check.
fn align_rows<'r>(
    source_rows: &'r [SampleRow],
    target_rows: &'r [SampleRow],
    keyed: bool,
) -> Vec<AlignedRow<'r>> {
    if keyed {
        let mut by_key: HashMap<String, &SampleRow> = HashMap::new();
        for row in target_rows {
            if let Some(key) = &row.key {
                by_key.insert(key.to_string(), row);
            }
        }
        source_rows
            .iter()
            .filter_map(|source| {
                let key = source.key.as_ref()?;
                let target = by_key.get(&key.to_string())?;
                Some(AlignedRow {
                    key: key.clone(),
                    source,
                    target,
                })
            })
            .collect()
    } else {
        source_rows
            .iter()
            .zip(target_rows)
            .enumerate()
            .map(|(position, (source, target))| AlignedRow {
                key: Value::Int(position as i64),
                source,
                target,
            })
            .collect()
    }
}

fn infer_pair_kind(
    pair: &ColumnPair,
    source_schema: &SchemaDescriptor,
    target_schema: &SchemaDescriptor,
) -> DataKind {
    let source_kind = source_schema
        .column(&pair.source_column)
        .map(|c| c.kind())
        .unwrap_or(DataKind::Other);
    if source_kind != DataKind::Other {
        return source_kind;
    }
    target_schema
        .column(&pair.target_column)
        .map(|c| c.kind())
        .unwrap_or(DataKind::Other)
}
