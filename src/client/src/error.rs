// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;
use tickstore_columnar::{ColumnBytesError, ParseDatasetKeyError};

/// An error returned by a [`Client`](crate::Client) call.
///
/// Every failure is a returned value; the client never retries and never
/// panics on malformed input.
#[derive(Debug, Error)]
pub enum Error {
    /// The base address did not parse as a URL, or cannot serve as a base
    /// for the RPC endpoint path.
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// `call` was invoked without request params.
    #[error("params must be non-null")]
    NullParams,
    /// The method name is outside the closed set this client understands.
    #[error("unsupported RPC response: {0}")]
    UnsupportedMethod(String),
    /// The HTTP round trip itself failed; the transport error is attached
    /// verbatim.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request envelope could not be encoded.
    #[error("encoding request: {0}")]
    EncodeRequest(#[from] rmp_serde::encode::Error),
    /// The reply envelope could not be decoded.
    #[error("decoding reply: {0}")]
    DecodeReply(#[from] rmp_serde::decode::Error),
    /// The service reported an error, either in the reply envelope or in a
    /// reply's error-text field.
    #[error("server error: {0}")]
    Server(String),
    /// A structurally valid reply carried an internally inconsistent packed
    /// payload.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// An error decoding a packed multi-dataset payload.
///
/// Decoding is total: every key the payload advertises must produce a column
/// set, so any inconsistency fails the whole payload and names the offending
/// key or column.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// A key has a start index but no row count.
    #[error("dataset {key:?} has a start index but no row count")]
    MissingRowCount {
        /// The offending key, in wire form.
        key: String,
    },
    /// A key has a row count but no start index.
    #[error("dataset {key:?} has a row count but no start index")]
    MissingStartIndex {
        /// The offending key, in wire form.
        key: String,
    },
    /// The shape descriptor lists disagree on the number of columns.
    #[error(
        "payload declares {names} column names, {types} column types, and {buffers} column buffers"
    )]
    ShapeArity {
        /// Number of declared column names.
        names: usize,
        /// Number of declared column types.
        types: usize,
        /// Number of column buffers present.
        buffers: usize,
    },
    /// A column buffer does not hold exactly the declared number of rows.
    #[error("column {column:?} holds {actual} bytes, expected {expected} for {rows} rows")]
    BufferSize {
        /// The offending column.
        column: String,
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
        /// The payload's declared row count.
        rows: usize,
    },
    /// A dataset's start index and row count overrun the packed buffers.
    #[error("dataset {key:?} spans rows {start}..{end} but the payload packs {length}")]
    OutOfRange {
        /// The offending key, in wire form.
        key: String,
        /// First row of the dataset.
        start: usize,
        /// One past the last row of the dataset.
        end: usize,
        /// Total rows packed in the payload.
        length: usize,
    },
    /// A column slice could not be reinterpreted as its declared type.
    #[error("column {column:?} in dataset {key:?}: {source}")]
    Column {
        /// The offending column.
        column: String,
        /// The dataset being decoded.
        key: String,
        /// The underlying reinterpretation error.
        source: ColumnBytesError,
    },
    /// A key string did not parse as a dataset key.
    #[error(transparent)]
    Key(#[from] ParseDatasetKeyError),
}
