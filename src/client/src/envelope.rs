// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The msgpack-RPC envelope.
//!
//! Requests are `{method, params: [args], id}` maps; replies are
//! `{result, error, id}` maps. Struct fields are encoded by name
//! (`to_vec_named`) so the envelope stays self-describing.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Serialize)]
struct Request<'a, P> {
    method: &'a str,
    params: (&'a P,),
    id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Reply<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    id: u64,
}

/// Encodes one request envelope for `method` with a single-element params
/// list.
pub(crate) fn encode_request<P: Serialize>(method: &str, params: &P) -> Result<Vec<u8>, Error> {
    let request = Request {
        method,
        params: (params,),
        id: 0,
    };
    Ok(rmp_serde::to_vec_named(&request)?)
}

/// Decodes one reply envelope from `body`, surfacing an envelope-level error
/// field as [`Error::Server`].
pub(crate) fn decode_reply<T, R>(body: R) -> Result<T, Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let reply: Reply<T> = rmp_serde::from_read(body)?;
    if let Some(message) = reply.error.filter(|m| !m.is_empty()) {
        return Err(Error::Server(message));
    }
    reply
        .result
        .ok_or_else(|| Error::Server("reply carried neither result nor error".into()))
}
