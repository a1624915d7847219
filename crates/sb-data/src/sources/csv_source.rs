//! CSV data source

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use csv::ReaderBuilder;
use tracing::info;

use crate::DataError;

/// Rows sampled for column type detection.
const MAX_SAMPLE_ROWS: usize = 1000;

/// CSV data source. The file is read once at construction and kept resident;
/// the datasets this explorer targets are hundreds of rows, not millions.
pub struct CsvSource {
    path: PathBuf,
    schema: Arc<Schema>,
    batch: RecordBatch,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub async fn new(path: PathBuf) -> Result<Self, DataError> {
        let (schema, batch) = tokio::task::spawn_blocking({
            let path = path.clone();
            move || Self::load_file(&path)
        })
        .await??;

        info!(
            rows = batch.num_rows(),
            columns = schema.fields().len(),
            path = %path.display(),
            "loaded csv source"
        );

        Ok(Self { path, schema, batch })
    }

    fn load_file(path: &Path) -> Result<(Arc<Schema>, RecordBatch), DataError> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        let fields: Vec<Field> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| Field::new(name, Self::detect_column_type(&rows, idx), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let batch = Self::build_batch(schema.clone(), &rows)?;

        Ok((schema, batch))
    }

    /// Detect column type from sample data. Counts with embedded thousands
    /// separators stay Utf8 and are handled by the normalizer.
    fn detect_column_type(rows: &[Vec<String>], col_idx: usize) -> DataType {
        let mut is_int = true;
        let mut is_float = true;
        let mut saw_value = false;

        for row in rows.iter().take(MAX_SAMPLE_ROWS) {
            if let Some(value) = row.get(col_idx) {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                saw_value = true;
                if is_int && value.parse::<i64>().is_err() {
                    is_int = false;
                }
                if is_float && value.parse::<f64>().is_err() {
                    is_float = false;
                }
            }
        }

        if !saw_value {
            DataType::Utf8
        } else if is_int {
            DataType::Int64
        } else if is_float {
            DataType::Float64
        } else {
            DataType::Utf8
        }
    }

    fn build_batch(schema: Arc<Schema>, rows: &[Vec<String>]) -> Result<RecordBatch, DataError> {
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let array: ArrayRef = match field.data_type() {
                DataType::Int64 => {
                    let mut builder = Int64Builder::new();
                    for row in rows {
                        match row.get(col_idx).map(|v| v.trim()) {
                            Some(value) if !value.is_empty() => {
                                match value.parse::<i64>() {
                                    Ok(parsed) => builder.append_value(parsed),
                                    Err(_) => builder.append_null(),
                                }
                            }
                            _ => builder.append_null(),
                        }
                    }
                    Arc::new(builder.finish())
                }
                DataType::Float64 => {
                    let mut builder = Float64Builder::new();
                    for row in rows {
                        match row.get(col_idx).map(|v| v.trim()) {
                            Some(value) if !value.is_empty() => {
                                match value.parse::<f64>() {
                                    Ok(parsed) => builder.append_value(parsed),
                                    Err(_) => builder.append_null(),
                                }
                            }
                            _ => builder.append_null(),
                        }
                    }
                    Arc::new(builder.finish())
                }
                _ => {
                    let mut builder = StringBuilder::new();
                    for row in rows {
                        match row.get(col_idx) {
                            Some(value) if !value.is_empty() => builder.append_value(value),
                            _ => builder.append_null(),
                        }
                    }
                    Arc::new(builder.finish())
                }
            };
            columns.push(array);
        }

        RecordBatch::try_new(schema, columns).map_err(DataError::from)
    }
}

#[async_trait]
impl sb_core::data::DataSource for CsvSource {
    async fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    async fn query_all(&self) -> anyhow::Result<RecordBatch> {
        Ok(self.batch.clone())
    }

    async fn row_count(&self) -> anyhow::Result<usize> {
        Ok(self.batch.num_rows())
    }

    fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::data::DataSource;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn detects_types_and_counts_rows() {
        let file = write_csv(
            "jurisdiction,offense,count,rate\n\
             State,drugs,10,0.5\n\
             Federal,violent,20,1.25\n",
        );
        let source = CsvSource::new(file.path().to_path_buf()).await.unwrap();

        let schema = source.schema().await;
        assert_eq!(
            schema.field_with_name("jurisdiction").unwrap().data_type(),
            &DataType::Utf8
        );
        assert_eq!(
            schema.field_with_name("count").unwrap().data_type(),
            &DataType::Int64
        );
        assert_eq!(
            schema.field_with_name("rate").unwrap().data_type(),
            &DataType::Float64
        );
        assert_eq!(source.row_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn separated_counts_stay_text_for_the_normalizer() {
        let file = write_csv(
            "name,count\n\
             State,\"1,234\"\n\
             Federal,56\n",
        );
        let source = CsvSource::new(file.path().to_path_buf()).await.unwrap();
        let schema = source.schema().await;
        assert_eq!(
            schema.field_with_name("count").unwrap().data_type(),
            &DataType::Utf8
        );

        let batch = source.query_all().await.unwrap();
        let normalized = crate::normalize_batch(&batch, "count").unwrap();
        assert_eq!(
            normalized.schema().field_with_name("count").unwrap().data_type(),
            &DataType::Int64
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = CsvSource::new(PathBuf::from("/no/such/file.csv")).await;
        assert!(matches!(result, Err(DataError::Io(_))));
    }
}
