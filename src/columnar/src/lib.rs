// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! In-memory columnar representation of tickstore result sets.
//!
//! A reply from the tickstore service is a mapping from [`DatasetKey`] to
//! [`ColumnSet`], where each column set holds one homogeneously-typed array
//! per column. This crate provides that data model plus the numeric
//! normalizer that coerces any numeric column to `f32`
//! ([`ColumnSet::column_as_f32`]). Reconstructing column sets from the wire
//! format lives in `tickstore-client`.

#![deny(missing_debug_implementations)]

mod coerce;
mod column;
mod key;
mod set;

pub use coerce::CoerceError;
pub use column::{ColumnArray, ColumnBytesError, ColumnShape, ElementType};
pub use key::{DatasetKey, ParseDatasetKeyError};
pub use set::{ColumnSet, DatasetMap};
