//! Hash aggregation (GROUP BY)

use crate::error::{QueryError, Result};
use crate::relation::column::{column, numeric_value};
use crate::relation::key::GroupKey;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, UInt32Array};
use arrow::compute;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
        };
        f.write_str(name)
    }
}

/// Aggregate function applied to an input column, named `alias` in the output.
/// `input: None` is only valid for COUNT and means `COUNT(*)`.
#[derive(Debug, Clone)]
pub struct AggregateExpr {
    pub func: AggregateFunction,
    pub input: Option<String>,
    pub alias: String,
}

impl AggregateExpr {
    pub fn count(alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunction::Count,
            input: None,
            alias: alias.into(),
        }
    }

    pub fn sum(input: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Sum, input, alias)
    }

    pub fn avg(input: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Avg, input, alias)
    }

    fn new(func: AggregateFunction, input: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func,
            input: Some(input.into()),
            alias: alias.into(),
        }
    }

    fn output_type(&self, input_type: Option<&DataType>) -> DataType {
        match self.func {
            AggregateFunction::Count => DataType::Int64,
            AggregateFunction::Sum => match input_type {
                Some(DataType::Int32 | DataType::Int64) => DataType::Int64,
                _ => DataType::Float64,
            },
            AggregateFunction::Avg => DataType::Float64,
        }
    }
}

impl fmt::Display for AggregateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = self.input.as_deref().unwrap_or("*");
        write!(f, "{}({}) AS {}", self.func, input, self.alias)
    }
}

/// Accumulator state for one aggregate of one group
#[derive(Debug, Clone, Default)]
struct AccumulatorState {
    count: i64,
    sum: f64,
    sum_i64: i64,
}

impl AccumulatorState {
    fn update(&mut self, func: AggregateFunction, input: Option<&ArrayRef>, row: usize) -> Result<()> {
        let Some(array) = input else {
            // COUNT(*)
            self.count += 1;
            return Ok(());
        };

        if func == AggregateFunction::Count {
            if array.is_valid(row) {
                self.count += 1;
            }
            return Ok(());
        }

        if let Some(v) = numeric_value(array, row)? {
            self.count += 1;
            self.sum += v;
            if let Some(a) = array.as_any().downcast_ref::<Int64Array>() {
                self.sum_i64 += a.value(row);
            } else if let Some(a) = array.as_any().downcast_ref::<arrow::array::Int32Array>() {
                self.sum_i64 += a.value(row) as i64;
            }
        }
        Ok(())
    }

    fn finish_f64(&self, func: AggregateFunction) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        match func {
            AggregateFunction::Count => Some(self.count as f64),
            AggregateFunction::Sum => Some(self.sum),
            AggregateFunction::Avg => Some(self.sum / self.count as f64),
        }
    }
}

/// Group `batch` by `group_by` and evaluate `aggregates` per group.
///
/// Output columns are the group columns (original types) followed by one
/// column per aggregate. Groups appear in order of first occurrence. With
/// no group columns the result is a single row, even for empty input.
pub fn aggregate(
    batch: &RecordBatch,
    group_by: &[&str],
    aggregates: &[AggregateExpr],
) -> Result<RecordBatch> {
    let key_arrays = group_by
        .iter()
        .map(|name| column(batch, name))
        .collect::<Result<Vec<_>>>()?;

    let input_arrays = aggregates
        .iter()
        .map(|agg| {
            if agg.input.is_none() && agg.func != AggregateFunction::Count {
                return Err(QueryError::Internal(format!(
                    "{} requires an input column",
                    agg.func
                )));
            }
            agg.input.as_deref().map(|c| column(batch, c)).transpose()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut groups: HashMap<GroupKey, usize> = HashMap::new();
    let mut first_rows: Vec<u32> = Vec::new();
    let mut states: Vec<Vec<AccumulatorState>> = Vec::new();

    for row in 0..batch.num_rows() {
        let key = GroupKey::from_row(&key_arrays, row)?;
        let slot = match groups.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = states.len();
                groups.insert(key, slot);
                first_rows.push(row as u32);
                states.push(vec![AccumulatorState::default(); aggregates.len()]);
                slot
            }
        };

        for (i, agg) in aggregates.iter().enumerate() {
            states[slot][i].update(agg.func, input_arrays[i], row)?;
        }
    }

    if group_by.is_empty() && states.is_empty() {
        states.push(vec![AccumulatorState::default(); aggregates.len()]);
    }

    let schema = batch.schema();
    let mut fields = Vec::with_capacity(group_by.len() + aggregates.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());

    let take_indices = UInt32Array::from(first_rows);
    for (name, array) in group_by.iter().zip(key_arrays.iter().copied()) {
        fields.push(schema.field_with_name(name)?.clone());
        columns.push(compute::take(array.as_ref(), &take_indices, None)?);
    }

    for (i, agg) in aggregates.iter().enumerate() {
        let input_type = input_arrays[i].map(|a| a.data_type());
        let output_type = agg.output_type(input_type);

        let array: ArrayRef = match (&agg.func, &output_type) {
            (AggregateFunction::Count, _) => Arc::new(Int64Array::from(
                states.iter().map(|s| s[i].count).collect::<Vec<_>>(),
            )),
            (AggregateFunction::Sum, DataType::Int64) => Arc::new(Int64Array::from(
                states
                    .iter()
                    .map(|s| (s[i].count > 0).then_some(s[i].sum_i64))
                    .collect::<Vec<_>>(),
            )),
            _ => Arc::new(Float64Array::from(
                states
                    .iter()
                    .map(|s| s[i].finish_f64(agg.func))
                    .collect::<Vec<_>>(),
            )),
        };

        let nullable = agg.func != AggregateFunction::Count;
        fields.push(Field::new(&agg.alias, output_type, nullable));
        columns.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    if columns.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    RecordBatch::try_new(schema, columns).map_err(Into::into)
}
