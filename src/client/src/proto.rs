// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Reply shapes for the supported RPC methods.
//!
//! These are field-level contracts over the msgpack-RPC envelope's `result`
//! value, one per [`Method`](crate::Method) family.

use serde::{Deserialize, Serialize};
use tickstore_columnar::DatasetMap;

use crate::dataset::MultiDataset;
use crate::error::DecodeError;

/// Reply to `Query` and `SQLStatement`: an ordered list of per-request
/// results, each carrying one packed payload.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MultiQueryReply {
    /// The per-request results, in request order.
    #[serde(default)]
    pub responses: Vec<QueryResult>,
}

impl MultiQueryReply {
    /// Decodes every payload and merges the maps in list order.
    ///
    /// A key appearing in several payloads is allowed; the last payload wins.
    pub fn decode(&self) -> Result<DatasetMap, DecodeError> {
        let mut map = DatasetMap::new();
        for response in &self.responses {
            map.extend(response.result.decode()?);
        }
        Ok(map)
    }
}

/// One result within a [`MultiQueryReply`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct QueryResult {
    /// The packed multi-dataset payload.
    pub result: MultiDataset,
}

/// Reply to `FeedStart`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FeedStartReply {
    /// Non-empty when the feed failed to start.
    #[serde(default)]
    pub error_text: String,
    /// Process identifier of the started feed.
    #[serde(default)]
    pub pid: i64,
}

/// Reply to `FeedList`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FeedListReply {
    /// One description per running feed.
    #[serde(default)]
    pub descriptions: Vec<String>,
}

/// Acknowledgement reply to `FeedKill`. No fields are consumed.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FeedKillReply {
    /// Non-empty when the kill failed; currently not interpreted.
    #[serde(default)]
    pub error_text: String,
}

/// Acknowledgement reply to `Write`. No fields are consumed.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WriteReply {
    /// Non-empty when the write failed; currently not interpreted.
    #[serde(default)]
    pub error_text: String,
}
