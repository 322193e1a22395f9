//! Hash join
//!
//! The right input is the build side; the left input is probed in order, so
//! output rows follow the left input's row order.

use crate::error::{QueryError, Result};
use crate::relation::column::column;
use crate::relation::key::GroupKey;
use arrow::array::{ArrayRef, UInt32Array};
use arrow::compute;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    /// Every left row; right columns are null where nothing matched
    Left,
    /// Left rows with no match, left columns only
    Anti,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inner => "Inner",
            Self::Left => "Left",
            Self::Anti => "Anti",
        };
        f.write_str(name)
    }
}

fn build_hash_table(
    batch: &RecordBatch,
    keys: &[&str],
) -> Result<HashMap<GroupKey, Vec<u32>>> {
    let key_arrays = keys
        .iter()
        .map(|k| column(batch, k))
        .collect::<Result<Vec<_>>>()?;

    let mut table: HashMap<GroupKey, Vec<u32>> = HashMap::new();
    for row in 0..batch.num_rows() {
        let key = GroupKey::from_row(&key_arrays, row)?;
        // Null keys never match (null != null in SQL)
        if key.has_null() {
            continue;
        }
        table.entry(key).or_default().push(row as u32);
    }
    Ok(table)
}

/// Join `left` and `right` on equality of the `(left, right)` column pairs.
///
/// Inner and left joins emit all left columns followed by the right columns
/// that are not join keys. Output column names must be unique.
pub fn hash_join(
    left: &RecordBatch,
    right: &RecordBatch,
    on: &[(&str, &str)],
    join_type: JoinType,
) -> Result<RecordBatch> {
    if on.is_empty() {
        return Err(QueryError::Execution(
            "hash join requires at least one key pair".to_string(),
        ));
    }

    let left_keys: Vec<&str> = on.iter().map(|(l, _)| *l).collect();
    let right_keys: Vec<&str> = on.iter().map(|(_, r)| *r).collect();

    let table = build_hash_table(right, &right_keys)?;
    let probe_arrays = left_keys
        .iter()
        .map(|k| column(left, k))
        .collect::<Result<Vec<_>>>()?;

    let mut left_indices: Vec<u32> = Vec::new();
    let mut right_indices: Vec<Option<u32>> = Vec::new();

    for row in 0..left.num_rows() {
        let key = GroupKey::from_row(&probe_arrays, row)?;
        let matches = if key.has_null() {
            None
        } else {
            table.get(&key)
        };

        match (join_type, matches) {
            (JoinType::Inner | JoinType::Left, Some(rows)) => {
                for &r in rows {
                    left_indices.push(row as u32);
                    right_indices.push(Some(r));
                }
            }
            (JoinType::Left, None) => {
                left_indices.push(row as u32);
                right_indices.push(None);
            }
            (JoinType::Anti, None) => {
                left_indices.push(row as u32);
            }
            _ => {}
        }
    }

    let left_take = UInt32Array::from(left_indices);
    let mut fields: Vec<Field> = left
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut columns = left
        .columns()
        .iter()
        .map(|c| compute::take(c.as_ref(), &left_take, None))
        .collect::<std::result::Result<Vec<ArrayRef>, _>>()?;

    if matches!(join_type, JoinType::Inner | JoinType::Left) {
        let right_take = UInt32Array::from(right_indices);
        let right_schema = right.schema();
        let excluded: HashSet<&str> = right_keys.iter().copied().collect();

        for (field, array) in right_schema.fields().iter().zip(right.columns()) {
            if excluded.contains(field.name().as_str()) {
                continue;
            }
            if fields.iter().any(|f| f.name() == field.name()) {
                return Err(QueryError::Execution(format!(
                    "duplicate column '{}' in join output",
                    field.name()
                )));
            }
            let field = field.as_ref().clone();
            let field = if join_type == JoinType::Left {
                field.with_nullable(true)
            } else {
                field
            };
            fields.push(field);
            columns.push(compute::take(array.as_ref(), &right_take, None)?);
        }
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, columns).map_err(Into::into)
}
