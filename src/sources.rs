//! Collaborator contracts for schema access and data sampling, plus an
//! in-memory reference implementation.
//!
//! The engine never talks to a database. Whatever owns the physical
//! connections implements [`SchemaAccess`] and [`DataSampling`] and hands
//! the engine already-materialized data; connection problems surface as
//! [`GuardError::Infrastructure`], which aborts the run and is never
//! conflated with a data-mismatch verdict.

use crate::core::{SchemaDescriptor, Value};
use crate::error::{GuardError, Result};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// One sampled row: the keying value (when a key column was requested) and
/// the cells aligned with the requested column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// The value of the key column, when one was requested.
    pub key: Option<Value>,
    /// Cells in requested-column order.
    pub values: Vec<Value>,
}

/// Read-only access to table schemas.
///
/// Must be stable for the duration of one test execution.
#[async_trait]
pub trait SchemaAccess: Send + Sync {
    /// Returns the ordered column descriptors for a table.
    async fn get_columns(&self, table: &str) -> Result<SchemaDescriptor>;
}

/// Read-only access to row counts and bounded row samples.
#[async_trait]
pub trait DataSampling: Send + Sync {
    /// Fetches up to `limit` rows of the named columns, ordered by
    /// `key_column` when given (else in the source's stable natural order).
    /// `where_clause` is an opaque filter the implementation may apply.
    async fn fetch_sample(
        &self,
        table: &str,
        columns: &[String],
        limit: usize,
        key_column: Option<&str>,
        where_clause: Option<&str>,
    ) -> Result<Vec<SampleRow>>;

    /// Counts the rows of a table, under the optional opaque filter.
    async fn count_rows(&self, table: &str, where_clause: Option<&str>) -> Result<u64>;
}

#[derive(Debug, Clone)]
struct InMemoryTable {
    schema: SchemaDescriptor,
    rows: Vec<Vec<Value>>,
}

/// An in-memory [`SchemaAccess`] + [`DataSampling`] implementation.
///
/// Backs the crate's tests and serves as the reference collaborator. Row
/// filters (`where_clause`) are not interpreted; the engine only passes
/// them through, and a real collaborator applies them engine-side.
///
/// # Examples
///
/// ```rust
/// use parity_guard::sources::InMemorySource;
/// use parity_guard::core::{ColumnDescriptor, SchemaDescriptor, Value};
///
/// let source = InMemorySource::new().with_table(
///     SchemaDescriptor::new(
///         "products",
///         vec![
///             ColumnDescriptor::new("id", "BIGINT", false),
///             ColumnDescriptor::new("price", "NUMERIC(10,2)", true),
///         ],
///     ),
///     vec![
///         vec![Value::Int(1), Value::Float(9.99)],
///         vec![Value::Int(2), Value::Float(19.99)],
///     ],
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<String, InMemoryTable>,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table; row cells must align with the schema's columns.
    pub fn with_table(mut self, schema: SchemaDescriptor, rows: Vec<Vec<Value>>) -> Self {
        self.tables.insert(
            schema.table.clone(),
            InMemoryTable { schema, rows },
        );
        self
    }

    fn table(&self, name: &str) -> Result<&InMemoryTable> {
        self.tables
            .get(name)
            .ok_or_else(|| GuardError::Infrastructure(format!("table '{name}' not registered")))
    }
}

#[async_trait]
impl SchemaAccess for InMemorySource {
    async fn get_columns(&self, table: &str) -> Result<SchemaDescriptor> {
        Ok(self.table(table)?.schema.clone())
    }
}

#[async_trait]
impl DataSampling for InMemorySource {
    async fn fetch_sample(
        &self,
        table: &str,
        columns: &[String],
        limit: usize,
        key_column: Option<&str>,
        where_clause: Option<&str>,
    ) -> Result<Vec<SampleRow>> {
        if where_clause.is_some() {
            debug!(table, "InMemorySource does not interpret row filters");
        }

        let entry = self.table(table)?;
        let index_of = |name: &str| -> Result<usize> {
            entry
                .schema
                .columns
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| {
                    GuardError::Infrastructure(format!("column '{name}' not in table '{table}'"))
                })
        };

        let column_indices: Vec<usize> = columns
            .iter()
            .map(|c| index_of(c))
            .collect::<Result<_>>()?;
        let key_index = key_column.map(|k| index_of(k)).transpose()?;

        let mut rows: Vec<&Vec<Value>> = entry.rows.iter().collect();
        if let Some(key_index) = key_index {
            rows.sort_by(|a, b| value_order(&a[key_index], &b[key_index]));
        }

        Ok(rows
            .into_iter()
            .take(limit)
            .map(|row| SampleRow {
                key: key_index.map(|i| row[i].clone()),
                values: column_indices.iter().map(|&i| row[i].clone()).collect(),
            })
            .collect())
    }

    async fn count_rows(&self, table: &str, where_clause: Option<&str>) -> Result<u64> {
        if where_clause.is_some() {
            debug!(table, "InMemorySource does not interpret row filters");
        }
        Ok(self.table(table)?.rows.len() as u64)
    }
}

/// Total order over values for stable key sorting; differing variants
/// order by kind name so sorting never panics.
fn value_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Int(x), Value::Float(y)) => {
            (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Value::Float(x), Value::Int(y)) => {
            x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal)
        }
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => format!("{:?}", a.kind()).cmp(&format!("{:?}", b.kind())),
    }
}
