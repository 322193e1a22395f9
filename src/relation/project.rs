//! Projection, renaming and derived columns

use crate::error::{QueryError, Result};
use crate::relation::column::{column, float64_column};
use crate::relation::scalar::round2_array;
use arrow::array::ArrayRef;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Select columns by name, in the given order
pub fn project(batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch> {
    let pairs: Vec<(&str, &str)> = columns.iter().map(|c| (*c, *c)).collect();
    project_as(batch, &pairs)
}

/// Select `(source, output)` column pairs, renaming as it goes
pub fn project_as(batch: &RecordBatch, columns: &[(&str, &str)]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());

    for (source, output) in columns {
        let field = schema
            .field_with_name(source)
            .map_err(|_| QueryError::ColumnNotFound(source.to_string()))?;
        fields.push(field.clone().with_name(*output));
        arrays.push(column(batch, source)?.clone());
    }

    build_batch(fields, arrays, batch.num_rows())
}

/// Append a derived column
pub fn with_column(batch: &RecordBatch, field: Field, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    if schema.field_with_name(field.name()).is_ok() {
        return Err(QueryError::Execution(format!(
            "column '{}' already exists",
            field.name()
        )));
    }

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields.push(field);
    let mut arrays = batch.columns().to_vec();
    arrays.push(array);

    build_batch(fields, arrays, batch.num_rows())
}

/// Replace a column's values, keeping its name and position
pub fn replace_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let idx = schema
        .index_of(name)
        .map_err(|_| QueryError::ColumnNotFound(name.to_string()))?;

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields[idx] = Field::new(name, array.data_type().clone(), fields[idx].is_nullable());
    let mut arrays = batch.columns().to_vec();
    arrays[idx] = array;

    build_batch(fields, arrays, batch.num_rows())
}

/// Round a Float64 column to two decimals in place
pub fn round_column(batch: &RecordBatch, name: &str) -> Result<RecordBatch> {
    let rounded = round2_array(float64_column(batch, name)?);
    replace_column(batch, name, Arc::new(rounded))
}

fn build_batch(fields: Vec<Field>, arrays: Vec<ArrayRef>, num_rows: usize) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(fields));
    if arrays.is_empty() {
        let options = arrow::record_batch::RecordBatchOptions::new().with_row_count(Some(num_rows));
        return RecordBatch::try_new_with_options(schema, arrays, &options).map_err(Into::into);
    }
    RecordBatch::try_new(schema, arrays).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{float64_column, int64_column, string_column};
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::DataType;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("amount", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Float64Array::from(vec![1.234, 5.678])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_project_as_renames_and_reorders() {
        let result = project_as(&batch(), &[("name", "label"), ("id", "id")]).unwrap();
        let schema = result.schema();
        assert_eq!(schema.field(0).name(), "label");
        assert_eq!(schema.field(1).name(), "id");
        assert_eq!(string_column(&result, "label").unwrap().value(1), "b");
    }

    #[test]
    fn test_project_missing_column() {
        assert!(matches!(
            project(&batch(), &["nope"]),
            Err(QueryError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_with_column_rejects_duplicates() {
        let extra: ArrayRef = Arc::new(Int64Array::from(vec![7, 8]));
        let result = with_column(
            &batch(),
            Field::new("extra", DataType::Int64, false),
            extra.clone(),
        )
        .unwrap();
        assert_eq!(int64_column(&result, "extra").unwrap().value(0), 7);

        assert!(with_column(&batch(), Field::new("id", DataType::Int64, false), extra).is_err());
    }

    #[test]
    fn test_round_column() {
        let result = round_column(&batch(), "amount").unwrap();
        let amounts = float64_column(&result, "amount").unwrap();
        assert_eq!(amounts.value(0), 1.23);
        assert_eq!(amounts.value(1), 5.68);
        assert_eq!(result.schema().field(2).name(), "amount");
    }
}
