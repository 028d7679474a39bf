// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An RPC client for the tickstore time-series query service.
//!
//! The service speaks msgpack-RPC over HTTP: every call is one POST of a
//! `{method, params, id}` envelope to the service's `rpc` endpoint. Replies
//! are method-specific; this crate normalizes all of them into the columnar
//! [`DatasetMap`](tickstore_columnar::DatasetMap) representation from
//! `tickstore-columnar`, decoding packed multi-dataset payloads
//! ([`dataset::MultiDataset`]) for query methods and synthesizing
//! single-entry maps under the sentinel key for feed-control replies.
//!
//! Calls are synchronous and independent: the client keeps no state across
//! calls and may be shared between threads.
//!
//! ```no_run
//! use tickstore_client::Client;
//!
//! # fn main() -> Result<(), tickstore_client::Error> {
//! let client = Client::new("http://localhost:5993/")?;
//! let args = vec![("destination", "AAPL/1Min/OHLCV:series")];
//! if let Some(map) = client.call("Query", Some(&args))? {
//!     for (key, set) in &map {
//!         println!("{key}: {} rows", set.row_count());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_debug_implementations)]
#![warn(missing_docs)]

mod client;
mod config;
mod envelope;
mod error;

pub mod dataset;
pub mod proto;

pub use client::{Client, Method};
pub use config::ClientConfig;
pub use error::{DecodeError, Error};
