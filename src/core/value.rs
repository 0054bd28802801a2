//! Materialized cell values and their comparison kinds.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single materialized cell value handed to the engine by the sampling
/// collaborator.
///
/// The engine never talks to a database; collaborators fetch rows and map
/// whatever driver-level representation they use into this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// SQL NULL on either side.
    Null,
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A text value.
    Text(String),
    /// A date/time value, timezone already resolved by the collaborator.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as a float when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the comparison kind of this value.
    pub fn kind(&self) -> DataKind {
        match self {
            Value::Null => DataKind::Other,
            Value::Bool(_) => DataKind::Boolean,
            Value::Int(_) | Value::Float(_) => DataKind::Numeric,
            Value::Text(_) => DataKind::Text,
            Value::Timestamp(_) => DataKind::Temporal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

/// The comparison kind of a column, inferred from its declared type or from
/// the values themselves.
///
/// The kind selects which tolerance comparator applies and which match-rate
/// threshold governs the column's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Integer, decimal, and floating point types.
    Numeric,
    /// Date, time, and timestamp types.
    Temporal,
    /// Character and text types.
    Text,
    /// Boolean types.
    Boolean,
    /// Anything the engine cannot classify.
    Other,
}

impl DataKind {
    /// Infers the comparison kind from a declared column type.
    ///
    /// Declared types arrive as engine-specific strings (`NUMERIC(10,2)`,
    /// `varchar2`, `TIMESTAMP WITHOUT TIME ZONE`, ...); classification is
    /// case-insensitive and ignores length/precision suffixes.
    pub fn from_declared_type(declared: &str) -> Self {
        let normalized = declared.trim().to_ascii_uppercase();
        let base = normalized
            .split(|c: char| c == '(' || c == ' ')
            .next()
            .unwrap_or("");

        match base {
            "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "NUMERIC" | "NUMBER"
            | "DECIMAL" | "FLOAT" | "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE" | "MONEY"
            | "SERIAL" | "BIGSERIAL" => DataKind::Numeric,
            "DATE" | "TIME" | "DATETIME" | "DATETIME2" | "TIMESTAMP" | "TIMESTAMPTZ"
            | "INTERVAL" => DataKind::Temporal,
            "CHAR" | "NCHAR" | "VARCHAR" | "VARCHAR2" | "NVARCHAR" | "NVARCHAR2" | "TEXT"
            | "CLOB" | "NCLOB" | "STRING" | "UUID" => DataKind::Text,
            "BOOL" | "BOOLEAN" | "BIT" => DataKind::Boolean,
            _ => DataKind::Other,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Numeric => "numeric",
            DataKind::Temporal => "temporal",
            DataKind::Text => "text",
            DataKind::Boolean => "boolean",
            DataKind::Other => "other",
        };
        write!(f, "{name}")
    }
}
