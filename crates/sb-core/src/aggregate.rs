//! Hierarchical aggregation of flat records
//!
//! Turns a record batch plus an ordered list of grouping columns into a
//! labeled tree, summing the measure column bottom-up. A grouping level at
//! which every record shares the same value is skipped entirely, so the
//! display never shows single-child rings.

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::hierarchy::HierarchyNode;

/// Errors from the aggregation pass
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("column '{0}' not found in batch")]
    MissingColumn(String),

    #[error("grouping column '{0}' is not a string column")]
    NotCategorical(String),

    #[error("measure column '{0}' is not numeric")]
    NotNumeric(String),
}

/// Measure column access, unified over the numeric types we accept.
enum MeasureColumn<'a> {
    Int(&'a Int64Array),
    Float(&'a Float64Array),
}

impl MeasureColumn<'_> {
    fn get(&self, row: usize) -> Option<f64> {
        match self {
            MeasureColumn::Int(arr) => (!arr.is_null(row)).then(|| arr.value(row) as f64),
            MeasureColumn::Float(arr) => (!arr.is_null(row)).then(|| arr.value(row)),
        }
    }
}

/// Aggregate `batch` by the ordered `group_by` columns, summing `measure`.
///
/// Returns the children of a synthetic root; an empty batch yields an empty
/// list. Group order within a level is first appearance in the data (the
/// partition layout sorts by name later).
pub fn aggregate(
    batch: &RecordBatch,
    group_by: &[String],
    measure: &str,
) -> Result<Vec<HierarchyNode>, AggregateError> {
    let schema = batch.schema();

    let mut columns = Vec::with_capacity(group_by.len());
    for name in group_by {
        let idx = schema
            .index_of(name)
            .map_err(|_| AggregateError::MissingColumn(name.clone()))?;
        let column = batch
            .column(idx)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| AggregateError::NotCategorical(name.clone()))?;
        columns.push(column);
    }

    let measure_idx = schema
        .index_of(measure)
        .map_err(|_| AggregateError::MissingColumn(measure.to_string()))?;
    let measure_col = batch.column(measure_idx);
    let measure_col = if let Some(arr) = measure_col.as_any().downcast_ref::<Int64Array>() {
        MeasureColumn::Int(arr)
    } else if let Some(arr) = measure_col.as_any().downcast_ref::<Float64Array>() {
        MeasureColumn::Float(arr)
    } else {
        return Err(AggregateError::NotNumeric(measure.to_string()));
    };

    debug!(
        rows = batch.num_rows(),
        levels = group_by.len(),
        "aggregating records"
    );
    let rows: Vec<usize> = (0..batch.num_rows()).collect();
    Ok(group_level(&columns, &measure_col, &rows))
}

fn group_level(
    columns: &[&StringArray],
    measure: &MeasureColumn<'_>,
    rows: &[usize],
) -> Vec<HierarchyNode> {
    let Some((current, remaining)) = columns.split_first() else {
        return Vec::new();
    };

    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for &row in rows {
        let name = if current.is_null(row) {
            String::new()
        } else {
            current.value(row).to_string()
        };
        groups.entry(name).or_default().push(row);
    }

    // No differentiation on this key: skip the level.
    if groups.len() == 1 {
        return group_level(remaining, measure, rows);
    }

    groups
        .into_iter()
        .map(|(name, group_rows)| {
            let size: f64 = group_rows.iter().filter_map(|&row| measure.get(row)).sum();
            let children = if remaining.is_empty() {
                Vec::new()
            } else {
                group_level(remaining, measure, &group_rows)
            };
            HierarchyNode {
                name,
                description: String::new(),
                size: Some(size),
                children,
                overlay: false,
            }
        })
        .collect()
}
