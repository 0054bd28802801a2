//! Schema descriptors fetched once per comparison.

use super::value::DataKind;
use serde::{Deserialize, Serialize};

/// One column of a table: name, engine-declared type, nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as declared by the engine.
    pub name: String,
    /// Declared type string, engine-specific (`NUMERIC(10,2)`, `varchar2`, ...).
    pub declared_type: String,
    /// Whether the column admits NULL.
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Creates a new column descriptor.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable,
        }
    }

    /// The comparison kind inferred from the declared type.
    pub fn kind(&self) -> DataKind {
        DataKind::from_declared_type(&self.declared_type)
    }
}

/// The ordered set of columns describing one table at comparison time.
///
/// Fetched once per comparison by the schema-access collaborator and
/// immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// The table this schema describes.
    pub table: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl SchemaDescriptor {
    /// Creates a schema descriptor for a table.
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns true if a column with this exact name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> SchemaDescriptor {
        SchemaDescriptor::new(
            "products",
            vec![
                ColumnDescriptor::new("id", "BIGINT", false),
                ColumnDescriptor::new("name", "VARCHAR(255)", false),
                ColumnDescriptor::new("price", "NUMERIC(10,2)", true),
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let schema = sample_schema();
        assert!(schema.has_column("price"));
        assert!(!schema.has_column("PRICE"));
        assert_eq!(schema.column("id").unwrap().declared_type, "BIGINT");
    }

    #[test]
    fn test_column_kind() {
        let schema = sample_schema();
        assert_eq!(schema.column("price").unwrap().kind(), DataKind::Numeric);
        assert_eq!(schema.column("name").unwrap().kind(), DataKind::Text);
    }

    #[test]
    fn test_order_preserved() {
        let schema = sample_schema();
        let names: Vec<&str> = schema.column_names().collect();
        assert_eq!(names, vec!["id", "name", "price"]);
    }
}
