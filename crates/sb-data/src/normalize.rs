//! Record normalization
//!
//! Trims every string field and re-types the measure column from delimited
//! text (`"1,234"`) to Int64. Unparseable numeric text is a reported error,
//! not a silently propagated NaN.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Builder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::DataError;

/// Parse an integer count that may carry thousands separators.
pub fn parse_count(text: &str) -> Option<i64> {
    let cleaned: String = text.trim().replace(',', "");
    cleaned.parse::<i64>().ok()
}

/// Normalize a raw batch: trim string columns and parse the measure column
/// to Int64 when it arrived as text. Row order is preserved; empty measure
/// cells become nulls.
pub fn normalize_batch(batch: &RecordBatch, measure: &str) -> Result<RecordBatch, DataError> {
    let schema = batch.schema();
    schema
        .index_of(measure)
        .map_err(|_| DataError::MissingColumn(measure.to_string()))?;

    let mut fields = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let is_measure = field.name() == measure;
        match column.as_any().downcast_ref::<StringArray>() {
            Some(strings) if is_measure => {
                columns.push(parse_measure_column(strings, field.name())?);
                fields.push(Field::new(field.name(), DataType::Int64, true));
            }
            Some(strings) => {
                columns.push(trim_column(strings));
                fields.push(field.as_ref().clone());
            }
            None => {
                columns.push(column.clone());
                fields.push(field.as_ref().clone());
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(DataError::from)
}

fn trim_column(strings: &StringArray) -> ArrayRef {
    let mut builder = StringBuilder::new();
    for row in 0..strings.len() {
        if strings.is_null(row) {
            builder.append_null();
        } else {
            builder.append_value(strings.value(row).trim());
        }
    }
    Arc::new(builder.finish())
}

fn parse_measure_column(strings: &StringArray, column: &str) -> Result<ArrayRef, DataError> {
    let mut builder = Int64Builder::new();
    for row in 0..strings.len() {
        if strings.is_null(row) || strings.value(row).trim().is_empty() {
            builder.append_null();
            continue;
        }
        let value = strings.value(row);
        match parse_count(value) {
            Some(parsed) => builder.append_value(parsed),
            None => {
                return Err(DataError::MalformedNumber {
                    column: column.to_string(),
                    row,
                    value: value.trim().to_string(),
                })
            }
        }
    }
    Ok(Arc::new(builder.finish()))
}
