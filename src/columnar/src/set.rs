// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use crate::column::ColumnArray;
use crate::key::DatasetKey;

/// The canonical reply container: one [`ColumnSet`] per dataset key.
pub type DatasetMap = BTreeMap<DatasetKey, ColumnSet>;

/// An ordered mapping from column name to typed column array.
///
/// Names are unique and iteration preserves insertion order, so a set built
/// from a reply's shape descriptors iterates in descriptor order. Every
/// column in a set has the same length, the set's row count; the decoder
/// upholds this invariant and rebuilds sets wholesale rather than patching
/// them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnSet {
    columns: Vec<(String, ColumnArray)>,
}

impl ColumnSet {
    /// Constructs an empty column set.
    pub fn new() -> ColumnSet {
        ColumnSet::default()
    }

    /// Inserts a column, replacing any existing column of the same name in
    /// place.
    pub fn insert<S: Into<String>>(&mut self, name: S, values: ColumnArray) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
    }

    /// Returns the column named `name`, if present.
    pub fn column(&self, name: &str) -> Option<&ColumnArray> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    /// The number of columns in the set.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The number of rows, i.e. the shared length of every column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Iterates over `(name, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnArray)> {
        self.columns.iter().map(|(n, values)| (n.as_str(), values))
    }

    /// Iterates over column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}
