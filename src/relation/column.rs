//! Column lookup by name with typed downcasts

use crate::error::{QueryError, Result};
use arrow::array::{
    Array, ArrayRef, Date32Array, Float64Array, Int32Array, Int64Array, StringArray,
    Time64MicrosecondArray,
};
use arrow::record_batch::RecordBatch;

/// Look up a column by name
pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| QueryError::ColumnNotFound(name.to_string()))?;
    Ok(batch.column(idx))
}

fn downcast<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &str,
) -> Result<&'a T> {
    let array = column(batch, name)?;
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        QueryError::Type(format!(
            "column '{}' is {}, expected {}",
            name,
            array.data_type(),
            expected
        ))
    })
}

pub fn int64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    downcast(batch, name, "Int64")
}

pub fn int32_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int32Array> {
    downcast(batch, name, "Int32")
}

pub fn float64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    downcast(batch, name, "Float64")
}

pub fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    downcast(batch, name, "Utf8")
}

pub fn date32_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Date32Array> {
    downcast(batch, name, "Date32")
}

pub fn time64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Time64MicrosecondArray> {
    downcast(batch, name, "Time64(Microsecond)")
}

/// Read a numeric cell as f64; `None` for null
pub(crate) fn numeric_value(array: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if array.is_null(row) {
        return Ok(None);
    }
    if let Some(a) = array.as_any().downcast_ref::<Float64Array>() {
        return Ok(Some(a.value(row)));
    }
    if let Some(a) = array.as_any().downcast_ref::<Int64Array>() {
        return Ok(Some(a.value(row) as f64));
    }
    if let Some(a) = array.as_any().downcast_ref::<Int32Array>() {
        return Ok(Some(a.value(row) as f64));
    }
    Err(QueryError::Type(format!(
        "expected numeric column, found {}",
        array.data_type()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("score", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Float64Array::from(vec![Some(1.5), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_typed_lookup() {
        let batch = batch();
        assert_eq!(int64_column(&batch, "id").unwrap().value(1), 2);
        assert!(matches!(
            string_column(&batch, "id"),
            Err(QueryError::Type(_))
        ));
        assert!(matches!(
            column(&batch, "missing"),
            Err(QueryError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_numeric_value() {
        let batch = batch();
        let id = column(&batch, "id").unwrap();
        let score = column(&batch, "score").unwrap();
        assert_eq!(numeric_value(id, 0).unwrap(), Some(1.0));
        assert_eq!(numeric_value(score, 0).unwrap(), Some(1.5));
        assert_eq!(numeric_value(score, 1).unwrap(), None);
    }
}
