//! # Parity Guard - Cross-Database Data Validation for Rust
//!
//! Parity Guard compares data held in two independent stores and decides
//! whether they agree within configured tolerances. It is built for
//! migration cutovers and replication monitoring, where "equal" rarely
//! means bitwise-identical: row counts may drift within a percentage,
//! numeric values carry representation noise, timestamps land within a
//! window, and text differs only in case or padding.
//!
//! ## Overview
//!
//! A validation is described by a compact `key=value` parameter string,
//! parsed into a strict [`config::ValidationConfig`]. The engine fetches
//! both table schemas, reconciles their columns (exact names, explicit
//! mappings, then a pluggable heuristic matcher), samples rows, compares
//! values through the tolerance engine, and aggregates everything into a
//! single [`core::ValidationOutcome`] with a `PASS` / `WARN` / `FAIL`
//! status. Hard violations fail the test; soft ones only warn.
//!
//! The engine never owns a database connection. Callers implement the
//! [`sources::SchemaAccess`] and [`sources::DataSampling`] traits and hand
//! the engine already-materialized schemas and rows, which keeps the core
//! deterministic and trivially testable.
//!
//! ## Quick Start
//!
//! ```rust
//! use parity_guard::prelude::*;
//! use parity_guard::core::{ColumnDescriptor, SchemaDescriptor, Value};
//! use parity_guard::sources::InMemorySource;
//!
//! # async fn example() -> parity_guard::error::Result<()> {
//! let schema = |table: &str| {
//!     SchemaDescriptor::new(
//!         table,
//!         vec![
//!             ColumnDescriptor::new("id", "BIGINT", false),
//!             ColumnDescriptor::new("amount", "NUMERIC(10,2)", true),
//!         ],
//!     )
//! };
//! let rows = vec![
//!     vec![Value::Int(1), Value::Float(100.00)],
//!     vec![Value::Int(2), Value::Float(250.50)],
//! ];
//! let source = InMemorySource::new()
//!     .with_table(schema("payments"), rows.clone())
//!     .with_table(schema("payments_replica"), rows);
//!
//! let run = ValidationRun::parse(
//!     "source_table=payments,target_table=payments_replica,\
//!      key_column=id,tolerance=5,validation_type=hard",
//! )?;
//! let outcome = run.execute(&source, &source).await?;
//!
//! assert!(outcome.overall_status.is_pass());
//! for finding in &outcome.column_findings {
//!     println!("{}: {:?}", finding.result.pair, finding.verdict);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Features
//!
//! - **Tolerance-aware comparison**: percentage or absolute numeric
//!   tolerance, decimal rounding, timestamp windows, and case/whitespace
//!   text normalization
//! - **Schema reconciliation**: identity matching, explicit
//!   `column_mappings`, exclusions, and heuristic name/type scoring with a
//!   pluggable [`reconcile::MatchScorer`]
//! - **Severity model**: hard violations fail, soft violations warn, and
//!   the overall status is resolved only after every check has run
//! - **Bounded diagnostics**: mismatch examples are capped per column so
//!   outcomes stay small on badly divergent data
//! - **Parallel execution**: independent test cases run as separate tasks
//!   via [`runner::run_parallel`]
//!
//! ## Architecture
//!
//! - **`config`**: the parameter mini-language and typed configuration
//! - **`core`**: values, schema descriptors, and outcome types
//! - **`reconcile`**: column pairing across the two schemas
//! - **`tolerance`**: per-kind value comparators
//! - **`compare`**: row-count and sampled column-value checks
//! - **`aggregate`**: thresholds, severity resolution, overall status
//! - **`runner`**: orchestration of one run and parallel execution
//! - **`sources`**: collaborator traits plus an in-memory implementation

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod reconcile;
pub mod runner;
pub mod sources;
pub mod tolerance;
