//! Data source abstraction

use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

/// Trait for tabular data sources feeding the explorer.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Get the schema of this data source
    async fn schema(&self) -> Arc<Schema>;

    /// Load the full record set
    async fn query_all(&self) -> anyhow::Result<RecordBatch>;

    /// Get total row count
    async fn row_count(&self) -> anyhow::Result<usize>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
