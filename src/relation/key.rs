//! Hashable row keys for grouping, joining and window partitioning

use crate::error::{QueryError, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Float64Array, Int32Array, Int64Array, StringArray,
    Time64MicrosecondArray,
};
use ordered_float::OrderedFloat;

/// Composite key built from one row of several columns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GroupKey {
    pub values: Vec<GroupValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum GroupValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(OrderedFloat<f64>),
    String(String),
    Date32(i32),
    Time64(i64),
}

impl GroupKey {
    pub fn from_row(arrays: &[&ArrayRef], row: usize) -> Result<Self> {
        let values = arrays
            .iter()
            .map(|arr| extract_value(arr, row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    pub fn has_null(&self) -> bool {
        self.values.iter().any(|v| matches!(v, GroupValue::Null))
    }
}

fn extract_value(arr: &ArrayRef, row: usize) -> Result<GroupValue> {
    if arr.is_null(row) {
        return Ok(GroupValue::Null);
    }

    let any = arr.as_any();
    if let Some(a) = any.downcast_ref::<Int64Array>() {
        return Ok(GroupValue::Int64(a.value(row)));
    }
    if let Some(a) = any.downcast_ref::<Int32Array>() {
        return Ok(GroupValue::Int64(a.value(row) as i64));
    }
    if let Some(a) = any.downcast_ref::<StringArray>() {
        return Ok(GroupValue::String(a.value(row).to_string()));
    }
    if let Some(a) = any.downcast_ref::<Float64Array>() {
        return Ok(GroupValue::Float64(OrderedFloat(a.value(row))));
    }
    if let Some(a) = any.downcast_ref::<Date32Array>() {
        return Ok(GroupValue::Date32(a.value(row)));
    }
    if let Some(a) = any.downcast_ref::<Time64MicrosecondArray>() {
        return Ok(GroupValue::Time64(a.value(row)));
    }
    if let Some(a) = any.downcast_ref::<BooleanArray>() {
        return Ok(GroupValue::Bool(a.value(row)));
    }

    Err(QueryError::Type(format!(
        "unsupported key type: {}",
        arr.data_type()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_keys_compare_by_value() {
        let ids: ArrayRef = Arc::new(Int64Array::from(vec![1, 1, 2]));
        let names: ArrayRef = Arc::new(StringArray::from(vec![Some("a"), Some("a"), None]));
        let cols = [&ids, &names];

        let k0 = GroupKey::from_row(&cols, 0).unwrap();
        let k1 = GroupKey::from_row(&cols, 1).unwrap();
        let k2 = GroupKey::from_row(&cols, 2).unwrap();

        assert_eq!(k0, k1);
        assert_ne!(k0, k2);
        assert!(!k0.has_null());
        assert!(k2.has_null());
    }

    #[test]
    fn test_int32_and_int64_keys_match() {
        let a: ArrayRef = Arc::new(Int32Array::from(vec![7]));
        let b: ArrayRef = Arc::new(Int64Array::from(vec![7]));
        assert_eq!(
            GroupKey::from_row(&[&a], 0).unwrap(),
            GroupKey::from_row(&[&b], 0).unwrap()
        );
    }
}
