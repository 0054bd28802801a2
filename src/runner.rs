//! Orchestration of one validation execution, and parallel execution of
//! independent test cases.
//!
//! A [`ValidationRun`] wires the engine components together: both schemas
//! are fetched through the [`SchemaAccess`] collaborator, reconciliation
//! resolves the column pairs, then the row-count check and the column-value
//! checks run concurrently (they have no ordering dependency on each
//! other), and aggregation joins on both before producing the single
//! [`ValidationOutcome`].
//!
//! Each test case's comparison is a self-contained computation over its own
//! inputs, so [`run_parallel`] executes many test cases as independent
//! tasks with per-task result buffers merged afterward.

use crate::aggregate::OutcomeAggregator;
use crate::compare::RowSetComparator;
use crate::config::ValidationConfig;
use crate::core::ValidationOutcome;
use crate::error::{GuardError, Result};
use crate::reconcile::{MatchScorer, SchemaReconciler};
use crate::sources::{DataSampling, SchemaAccess};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// One test case, ready to execute against a pair of collaborators.
#[derive(Debug)]
pub struct ValidationRun {
    config: ValidationConfig,
    reconciler: SchemaReconciler,
}

impl ValidationRun {
    /// Creates a run with the default match scorer.
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            reconciler: SchemaReconciler::default(),
        }
    }

    /// Parses the parameter mini-language and creates a run.
    pub fn parse(params: &str) -> Result<Self> {
        Ok(Self::new(ValidationConfig::parse(params)?))
    }

    /// Substitutes the heuristic matching strategy.
    pub fn with_scorer(mut self, scorer: impl MatchScorer + 'static) -> Self {
        self.reconciler = SchemaReconciler::new(scorer);
        self
    }

    /// The run's configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Executes the validation and produces its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Infrastructure`] when a collaborator fails;
    /// data disagreements never error, they become findings in the outcome.
    #[instrument(skip(self, schemas, sampler), fields(
        source.table = %self.config.source_table,
        target.table = %self.config.target_table,
    ))]
    pub async fn execute(
        &self,
        schemas: &dyn SchemaAccess,
        sampler: &dyn DataSampling,
    ) -> Result<ValidationOutcome> {
        let started = Instant::now();

        let (source_schema, target_schema) = futures::try_join!(
            schemas.get_columns(&self.config.source_table),
            schemas.get_columns(&self.config.target_table),
        )?;

        let reconciled = self
            .reconciler
            .reconcile(&source_schema, &target_schema, &self.config);

        let comparator = RowSetComparator::new(&self.config);
        let (row_count_finding, results) = futures::try_join!(
            comparator.row_count_check(sampler),
            comparator.column_checks(sampler, &source_schema, &target_schema, &reconciled.pairs),
        )?;

        let outcome = OutcomeAggregator::new(&self.config).aggregate(
            row_count_finding,
            results,
            reconciled.diagnostics,
            started.elapsed().as_millis() as u64,
        );

        info!(
            status = %outcome.overall_status,
            columns = outcome.column_findings.len(),
            hard_failures = outcome.hard_failures.len(),
            soft_warnings = outcome.soft_warnings.len(),
            elapsed_ms = outcome.elapsed_ms,
            "Validation execution complete"
        );

        Ok(outcome)
    }
}

/// Executes independent test cases in parallel, preserving input order.
///
/// Each case runs as its own task with its own result buffer; nothing is
/// shared between cases beyond the (read-only) collaborators. A case that
/// aborts with a configuration or infrastructure error contributes its
/// error in place of an outcome without affecting the other cases.
pub async fn run_parallel<S, D>(
    cases: Vec<(String, ValidationConfig)>,
    schemas: Arc<S>,
    sampler: Arc<D>,
) -> Vec<(String, Result<ValidationOutcome>)>
where
    S: SchemaAccess + 'static,
    D: DataSampling + 'static,
{
    let handles: Vec<_> = cases
        .into_iter()
        .map(|(name, config)| {
            let schemas = Arc::clone(&schemas);
            let sampler = Arc::clone(&sampler);
            let handle = tokio::spawn(async move {
                ValidationRun::new(config)
                    .execute(schemas.as_ref(), sampler.as_ref())
                    .await
            });
            (name, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let outcome = match handle.await {
            Ok(result) => result,
            Err(e) => Err(GuardError::Internal(format!("validation task panicked: {e}"))),
        };
        outcomes.push((name, outcome));
    }
    outcomes
}
