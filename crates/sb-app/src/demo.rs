//! Demo data source with a synthetic confinement dataset
//!
//! Lets the explorer run without any file loaded. The numbers are
//! deterministic and roughly shaped like national incarceration statistics.

use std::sync::Arc;

use anyhow::Result;
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

use sb_core::data::DataSource;

/// (jurisdiction, facility_type, offense_category, number)
const ROWS: &[(&str, &str, &str, i64)] = &[
    ("State", "prisons", "violent", 707_000),
    ("State", "prisons", "property", 238_000),
    ("State", "prisons", "drugs", 191_000),
    ("State", "prisons", "public order", 153_000),
    ("State", "prisons", "other", 11_000),
    ("Local", "jails", "violent", 145_000),
    ("Local", "jails", "drugs", 130_000),
    ("Local", "jails", "property", 120_000),
    ("Local", "jails", "other", 80_000),
    ("Local", "jails", "public order", 75_000),
    ("Federal", "prisons", "drugs", 77_000),
    ("Federal", "prisons", "public order", 59_000),
    ("Federal", "prisons", "violent", 13_000),
    ("Federal", "prisons", "property", 11_000),
    ("Federal", "prisons", "other", 6_000),
    ("Kids", "juvenile facilities", "person", 12_000),
    ("Kids", "juvenile facilities", "property", 7_000),
    ("Kids", "juvenile facilities", "technical", 5_000),
    ("Kids", "juvenile facilities", "public order", 4_100),
    ("Kids", "juvenile facilities", "drugs", 2_500),
    ("Kids", "juvenile facilities", "status offense", 2_300),
    ("Military", "military prisons", "violent", 700),
    ("Military", "military prisons", "sexual", 400),
    ("Indian County jails", "jails", "violent", 1_400),
    ("Indian County jails", "jails", "other", 1_100),
    ("Territorial prisons", "prisons", "violent", 6_000),
    ("Territorial prisons", "prisons", "other", 2_600),
    ("Territorial prisons", "prisons", "drugs", 2_400),
    ("Immigration Detention", "detention centers", "other", 34_000),
    ("Civil Commitment", "civil commitment centers", "sexual", 5_400),
];

/// Demo data source that serves a fixed synthetic batch
pub struct DemoDataSource {
    schema: SchemaRef,
    batch: RecordBatch,
}

impl DemoDataSource {
    pub fn new() -> Self {
        let schema = Arc::new(Schema::new(vec![
            Field::new("jurisdiction", DataType::Utf8, false),
            Field::new("facility_type", DataType::Utf8, false),
            Field::new("offense_category", DataType::Utf8, false),
            Field::new("number", DataType::Int64, false),
        ]));

        let jurisdictions = StringArray::from_iter_values(ROWS.iter().map(|r| r.0));
        let facilities = StringArray::from_iter_values(ROWS.iter().map(|r| r.1));
        let offenses = StringArray::from_iter_values(ROWS.iter().map(|r| r.2));
        let numbers = Int64Array::from_iter_values(ROWS.iter().map(|r| r.3));

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(jurisdictions),
                Arc::new(facilities),
                Arc::new(offenses),
                Arc::new(numbers),
            ],
        )
        .expect("demo batch is well-formed");

        Self { schema, batch }
    }
}

impl Default for DemoDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for DemoDataSource {
    async fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    async fn query_all(&self) -> Result<RecordBatch> {
        Ok(self.batch.clone())
    }

    async fn row_count(&self) -> Result<usize> {
        Ok(self.batch.num_rows())
    }

    fn source_name(&self) -> &str {
        "synthetic demo data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_batch_matches_the_default_orientation_columns() {
        let source = DemoDataSource::new();
        let schema = source.schema().await;
        for column in ["jurisdiction", "facility_type", "offense_category", "number"] {
            assert!(schema.field_with_name(column).is_ok(), "missing {column}");
        }
        assert_eq!(source.row_count().await.unwrap(), ROWS.len());
    }
}
