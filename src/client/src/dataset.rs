// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The packed multi-dataset payload and its decoder.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tickstore_columnar::{
    ColumnArray, ColumnSet, ColumnShape, DatasetKey, DatasetMap, ElementType,
};

use crate::error::DecodeError;

/// A packed payload carrying several result sets in shared column arenas.
///
/// The arenas hold `length` rows of every dataset in the payload,
/// concatenated; `start_index` and `lengths` locate each dataset within them,
/// in row units shared by all columns. The two tables must advertise exactly
/// the same key set.
///
/// Arenas are [`Bytes`], so cloning a payload or slicing an arena shares the
/// underlying wire buffer. Decoding copies: every [`ColumnArray`] produced by
/// [`MultiDataset::decode`] owns its values and is safe to mutate after the
/// payload is dropped.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MultiDataset {
    /// Element type of each column, by position.
    pub types: Vec<ElementType>,
    /// Name of each column, by position.
    pub names: Vec<String>,
    /// One packed little-endian arena per column.
    pub data: Vec<Bytes>,
    /// Total number of rows packed into each arena.
    pub length: usize,
    /// First row of each dataset.
    pub start_index: BTreeMap<String, usize>,
    /// Row count of each dataset.
    pub lengths: BTreeMap<String, usize>,
}

impl MultiDataset {
    /// Pairs up the parallel `names`/`types` lists into shape descriptors,
    /// in declaration order.
    pub fn shapes(&self) -> Result<Vec<ColumnShape>, DecodeError> {
        if self.names.len() != self.types.len() || self.names.len() != self.data.len() {
            return Err(DecodeError::ShapeArity {
                names: self.names.len(),
                types: self.types.len(),
                buffers: self.data.len(),
            });
        }
        Ok(self
            .names
            .iter()
            .zip(&self.types)
            .map(|(name, &element_type)| ColumnShape {
                name: name.clone(),
                element_type,
            })
            .collect())
    }

    /// Decodes the payload into one [`ColumnSet`] per advertised key.
    ///
    /// Decoding is total over the offset table: the result's key set equals
    /// `start_index`'s key set exactly, or the whole payload is rejected.
    /// Pure; performs no I/O.
    pub fn decode(&self) -> Result<DatasetMap, DecodeError> {
        let shapes = self.shapes()?;
        for (shape, arena) in shapes.iter().zip(&self.data) {
            let expected = self.length.saturating_mul(shape.element_type.byte_width());
            if arena.len() != expected {
                return Err(DecodeError::BufferSize {
                    column: shape.name.clone(),
                    expected,
                    actual: arena.len(),
                    rows: self.length,
                });
            }
        }
        if let Some(key) = self
            .lengths
            .keys()
            .find(|key| !self.start_index.contains_key(*key))
        {
            return Err(DecodeError::MissingStartIndex { key: key.clone() });
        }

        let mut out = DatasetMap::new();
        for (key, &start) in &self.start_index {
            let rows = *self
                .lengths
                .get(key)
                .ok_or_else(|| DecodeError::MissingRowCount { key: key.clone() })?;
            let set = self.column_set(key, &shapes, start, rows)?;
            out.insert(key.parse::<DatasetKey>()?, set);
        }
        Ok(out)
    }

    /// Slices `rows` rows starting at row `start` out of every arena,
    /// assembling them into a column set in shape order.
    fn column_set(
        &self,
        key: &str,
        shapes: &[ColumnShape],
        start: usize,
        rows: usize,
    ) -> Result<ColumnSet, DecodeError> {
        let end = start
            .checked_add(rows)
            .filter(|&end| end <= self.length)
            .ok_or(DecodeError::OutOfRange {
                key: key.into(),
                start,
                end: start.saturating_add(rows),
                length: self.length,
            })?;
        let mut set = ColumnSet::new();
        for (shape, arena) in shapes.iter().zip(&self.data) {
            let width = shape.element_type.byte_width();
            let cells = &arena[start * width..end * width];
            let values = ColumnArray::from_le_bytes(shape.element_type, cells).map_err(|source| {
                DecodeError::Column {
                    column: shape.name.clone(),
                    key: key.into(),
                    source,
                }
            })?;
            set.insert(shape.name.clone(), values);
        }
        Ok(set)
    }
}

/// Builders for packed payloads, shared by the unit and property tests.
#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Packs `values` little-endian into one arena.
    pub fn f32_arena(values: impl IntoIterator<Item = f32>) -> Bytes {
        let mut arena = Vec::new();
        for v in values {
            arena.extend_from_slice(&v.to_le_bytes());
        }
        Bytes::from(arena)
    }

    /// A one-column `f4` payload over `spans` (key, start, rows) triples.
    pub fn f32_payload(name: &str, length: usize, spans: &[(&str, usize, usize)]) -> MultiDataset {
        MultiDataset {
            types: vec![ElementType::F32],
            names: vec![name.into()],
            data: vec![f32_arena((0..length).map(|i| i as f32))],
            length,
            start_index: spans.iter().map(|&(k, s, _)| (k.into(), s)).collect(),
            lengths: spans.iter().map(|&(k, _, r)| (k.into(), r)).collect(),
        }
    }
}
