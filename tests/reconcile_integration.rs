//! End-to-end scenarios for schema reconciliation across differently-shaped
//! tables: explicit mappings, exclusions, heuristic matching, and the
//! diagnostics they leave behind.

use parity_guard::core::{
    ColumnDescriptor, OverallStatus, PairOrigin, SchemaDescriptor, Value,
};
use parity_guard::runner::ValidationRun;
use parity_guard::sources::InMemorySource;

fn legacy_products() -> (SchemaDescriptor, Vec<Vec<Value>>) {
    let schema = SchemaDescriptor::new(
        "products",
        vec![
            ColumnDescriptor::new("id", "BIGINT", false),
            ColumnDescriptor::new("cost_price", "NUMERIC(10,2)", true),
            ColumnDescriptor::new("description", "VARCHAR(255)", true),
            ColumnDescriptor::new("created_date", "TIMESTAMP", true),
        ],
    );
    let rows = vec![
        vec![
            Value::Int(1),
            Value::Float(9.99),
            Value::from("blue widget"),
            Value::Null,
        ],
        vec![
            Value::Int(2),
            Value::Float(24.5),
            Value::from("red gadget"),
            Value::Null,
        ],
    ];
    (schema, rows)
}

fn migrated_products() -> (SchemaDescriptor, Vec<Vec<Value>>) {
    let schema = SchemaDescriptor::new(
        "new_products",
        vec![
            ColumnDescriptor::new("id", "BIGINT", false),
            ColumnDescriptor::new("price", "NUMERIC(10,2)", true),
            ColumnDescriptor::new("product_description", "VARCHAR(255)", true),
            ColumnDescriptor::new("migrated_at", "TIMESTAMP", true),
        ],
    );
    let rows = vec![
        vec![
            Value::Int(1),
            Value::Float(9.99),
            Value::from("blue widget"),
            Value::Null,
        ],
        vec![
            Value::Int(2),
            Value::Float(24.5),
            Value::from("red gadget"),
            Value::Null,
        ],
    ];
    (schema, rows)
}

fn migration_source() -> InMemorySource {
    let (source_schema, source_rows) = legacy_products();
    let (target_schema, target_rows) = migrated_products();
    InMemorySource::new()
        .with_table(source_schema, source_rows)
        .with_table(target_schema, target_rows)
}

#[tokio::test]
async fn test_explicit_mappings_bridge_renamed_columns() {
    let source = migration_source();
    let outcome = ValidationRun::parse(
        "source_table=products,target_table=new_products,key_column=id,\
         column_mappings=cost_price=price,description=product_description,\
         exclude_columns=created_date,migrated_at",
    )
    .unwrap()
    .execute(&source, &source)
    .await
    .unwrap();

    assert_eq!(outcome.overall_status, OverallStatus::Pass);
    assert_eq!(outcome.column_findings.len(), 3);

    let origins: Vec<(&str, PairOrigin)> = outcome
        .column_findings
        .iter()
        .map(|f| (f.result.pair.source_column.as_str(), f.result.pair.origin))
        .collect();
    assert_eq!(
        origins,
        vec![
            ("id", PairOrigin::Identity),
            ("cost_price", PairOrigin::Explicit),
            ("description", PairOrigin::Explicit),
        ]
    );
    assert_eq!(
        outcome.diagnostics.excluded,
        vec!["created_date".to_string(), "migrated_at".to_string()]
    );
}

#[tokio::test]
async fn test_heuristic_matching_bridges_similar_names() {
    let source = migration_source();
    // No mappings declared: description/product_description pair up by
    // name similarity plus matching text kinds.
    let outcome = ValidationRun::parse(
        "source_table=products,target_table=new_products,key_column=id,\
         exclude_columns=created_date,migrated_at",
    )
    .unwrap()
    .execute(&source, &source)
    .await
    .unwrap();

    let description = outcome
        .column_findings
        .iter()
        .find(|f| f.result.pair.source_column == "description")
        .unwrap();
    assert_eq!(description.result.pair.origin, PairOrigin::Heuristic);
    assert_eq!(description.result.pair.target_column, "product_description");
    assert_eq!(description.result.match_count, 2);

    // cost_price/price share a name suffix and a numeric kind, which also
    // clears the confidence floor.
    let cost = outcome
        .column_findings
        .iter()
        .find(|f| f.result.pair.source_column == "cost_price")
        .unwrap();
    assert_eq!(cost.result.pair.origin, PairOrigin::Heuristic);
    assert_eq!(cost.result.pair.target_column, "price");

    assert!(outcome.diagnostics.source_only.is_empty());
    assert!(outcome.diagnostics.target_only.is_empty());
    assert_eq!(outcome.overall_status, OverallStatus::Pass);
}

#[tokio::test]
async fn test_unrelated_names_stay_unpaired() {
    let source_schema = SchemaDescriptor::new(
        "products",
        vec![
            ColumnDescriptor::new("id", "BIGINT", false),
            ColumnDescriptor::new("warehouse_zone", "VARCHAR(10)", true),
        ],
    );
    let target_schema = SchemaDescriptor::new(
        "new_products",
        vec![
            ColumnDescriptor::new("id", "BIGINT", false),
            ColumnDescriptor::new("supplier_email", "VARCHAR(255)", true),
        ],
    );
    let source = InMemorySource::new()
        .with_table(source_schema, vec![vec![Value::Int(1), Value::from("A1")]])
        .with_table(
            target_schema,
            vec![vec![Value::Int(1), Value::from("a@b.example")]],
        );

    let outcome = ValidationRun::parse(
        "source_table=products,target_table=new_products,key_column=id",
    )
    .unwrap()
    .execute(&source, &source)
    .await
    .unwrap();

    assert_eq!(outcome.overall_status, OverallStatus::Pass);
    assert_eq!(
        outcome.diagnostics.source_only,
        vec!["warehouse_zone".to_string()]
    );
    assert_eq!(
        outcome.diagnostics.target_only,
        vec!["supplier_email".to_string()]
    );
}

#[tokio::test]
async fn test_invalid_mapping_warns_but_never_fails() {
    let source = migration_source();
    let outcome = ValidationRun::parse(
        "source_table=products,target_table=new_products,key_column=id,\
         column_mappings=ghost_column=price,description=product_description,\
         exclude_columns=created_date,migrated_at,cost_price",
    )
    .unwrap()
    .execute(&source, &source)
    .await
    .unwrap();

    assert_eq!(outcome.overall_status, OverallStatus::Pass);
    assert_eq!(outcome.diagnostics.ambiguous.len(), 1);
    assert_eq!(outcome.diagnostics.ambiguous[0].column, "ghost_column");
    // The valid mapping in the same declaration still applies.
    assert!(outcome
        .column_findings
        .iter()
        .any(|f| f.result.pair.target_column == "product_description"));
}

#[tokio::test]
async fn test_exclusions_apply_on_either_side() {
    let source = migration_source();
    let outcome = ValidationRun::parse(
        "source_table=products,target_table=new_products,key_column=id,\
         column_mappings=cost_price=price,description=product_description,\
         exclude_columns=created_date,migrated_at,price",
    )
    .unwrap()
    .execute(&source, &source)
    .await
    .unwrap();

    // Excluding the target-side name removes the explicit pair entirely.
    assert!(outcome
        .column_findings
        .iter()
        .all(|f| f.result.pair.target_column != "price"));
    assert!(outcome.diagnostics.excluded.contains(&"price".to_string()));
}

#[tokio::test]
async fn test_unmatched_columns_reported_not_failed() {
    let (source_schema, source_rows) = legacy_products();
    let target_schema = SchemaDescriptor::new(
        "new_products",
        vec![ColumnDescriptor::new("id", "BIGINT", false)],
    );
    let target_rows = vec![vec![Value::Int(1)], vec![Value::Int(2)]];
    let source = InMemorySource::new()
        .with_table(source_schema, source_rows)
        .with_table(target_schema, target_rows);

    let outcome = ValidationRun::parse(
        "source_table=products,target_table=new_products,key_column=id",
    )
    .unwrap()
    .execute(&source, &source)
    .await
    .unwrap();

    // Only `id` is comparable; the rest of the source schema is reported
    // as source-only and the test still passes.
    assert_eq!(outcome.overall_status, OverallStatus::Pass);
    assert_eq!(outcome.column_findings.len(), 1);
    assert_eq!(
        outcome.diagnostics.source_only,
        vec![
            "cost_price".to_string(),
            "description".to_string(),
            "created_date".to_string(),
        ]
    );
}
