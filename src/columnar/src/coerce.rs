// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::column::{ColumnArray, ElementType};
use crate::set::ColumnSet;

impl ColumnSet {
    /// Coerces the column named `name` to a canonical `f32` array.
    ///
    /// Integer columns of any width and `f64` columns convert value by value
    /// with standard numeric conversion semantics; `f32` columns are copied.
    /// The result is always newly allocated and safe to mutate. Columns with
    /// a non-numeric element type (strings, timestamps) are an error.
    pub fn column_as_f32(&self, name: &str) -> Result<Vec<f32>, CoerceError> {
        let column = self
            .column(name)
            .ok_or_else(|| CoerceError::NoSuchColumn(name.into()))?;
        match column {
            ColumnArray::I8(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::I16(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::I32(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::I64(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::U8(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::U16(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::U32(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::U64(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::F32(v) => Ok(v.clone()),
            ColumnArray::F64(v) => Ok(v.iter().map(|&x| x as f32).collect()),
            ColumnArray::Str(_) | ColumnArray::Epoch(_) => Err(CoerceError::UnsupportedType {
                column: name.into(),
                element_type: column.element_type(),
            }),
        }
    }
}

/// An error coercing a column to `f32`.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CoerceError {
    /// The named column does not exist in the set.
    #[error("no column named {0:?}")]
    NoSuchColumn(String),
    /// The column exists but its element type has no numeric coercion.
    #[error("column {column:?} has non-numeric element type {element_type}")]
    UnsupportedType {
        /// The requested column.
        column: String,
        /// The column's element type.
        element_type: ElementType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(name: &str, values: ColumnArray) -> ColumnSet {
        let mut set = ColumnSet::new();
        set.insert(name, values);
        set
    }

    #[test]
    fn converts_integers_exactly() {
        let set = set_with("volume", ColumnArray::I32(vec![1, 2, 3]));
        assert_eq!(set.column_as_f32("volume").unwrap(), [1.0, 2.0, 3.0]);

        let set = set_with("count", ColumnArray::U64(vec![0, 250]));
        assert_eq!(set.column_as_f32("count").unwrap(), [0.0, 250.0]);
    }

    #[test]
    fn narrows_f64_with_standard_rounding() {
        let set = set_with("avg", ColumnArray::F64(vec![1.5, 2.25]));
        assert_eq!(set.column_as_f32("avg").unwrap(), [1.5f32, 2.25f32]);

        // Beyond f32 precision: nearest representable value.
        let set = set_with("avg", ColumnArray::F64(vec![1.000000059604645]));
        assert_eq!(set.column_as_f32("avg").unwrap(), [1.000000059604645f64 as f32]);
    }

    #[test]
    fn copies_f32_columns() {
        let set = set_with("ask", ColumnArray::F32(vec![1.25, 2.5]));
        let out = set.column_as_f32("ask").unwrap();
        assert_eq!(out, [1.25, 2.5]);
    }

    #[test]
    fn errors_name_the_missing_column() {
        let set = ColumnSet::new();
        assert_eq!(
            set.column_as_f32("bid"),
            Err(CoerceError::NoSuchColumn("bid".into())),
        );
    }

    #[test]
    fn rejects_non_numeric_columns() {
        let set = set_with("symbol", ColumnArray::Str(vec!["AAPL".into()]));
        assert_eq!(
            set.column_as_f32("symbol"),
            Err(CoerceError::UnsupportedType {
                column: "symbol".into(),
                element_type: ElementType::Str16,
            }),
        );

        let set = set_with("epoch", ColumnArray::Epoch(vec![0]));
        assert!(matches!(
            set.column_as_f32("epoch"),
            Err(CoerceError::UnsupportedType { .. }),
        ));
    }
}
