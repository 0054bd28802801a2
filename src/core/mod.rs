//! Core data model for the parity-guard validation engine.
//!
//! This module provides the fundamental types the engine components share:
//!
//! - **[`Value`]** / **[`DataKind`]**: materialized cell values and their
//!   comparison kinds
//! - **[`SchemaDescriptor`]** / **[`ColumnDescriptor`]**: ordered column
//!   metadata for one table
//! - **[`ColumnPair`]**: a resolved source/target correspondence
//! - **[`ValidationOutcome`]** and its findings: the single structure a
//!   reporting collaborator consumes
//!
//! All of these are plain serializable data. The engine components
//! (`config`, `reconcile`, `tolerance`, `compare`, `aggregate`, `runner`)
//! build on top of them.

mod outcome;
mod schema;
mod value;

pub use outcome::{
    AmbiguousMappingWarning, ColumnFinding, ColumnPair, CompareMode, ComparisonResult,
    MismatchSample, OverallStatus, PairOrigin, ReconcileDiagnostics, RowCountFinding, Severity,
    ValidationOutcome, VerdictStatus,
};
pub use schema::{ColumnDescriptor, SchemaDescriptor};
pub use value::{DataKind, Value};
