// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;
use std::str::FromStr;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tickstore_columnar::{ColumnArray, ColumnSet, DatasetKey, DatasetMap};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::envelope;
use crate::error::Error;
use crate::proto::{FeedKillReply, FeedListReply, FeedStartReply, MultiQueryReply, WriteReply};

/// The closed set of RPC methods this client understands.
///
/// Each method determines the reply shape the client expects and how that
/// reply is normalized into a [`DatasetMap`]; see [`Client::call_method`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    /// Retrieve datasets by key and time range.
    Query,
    /// Run a SQL statement server-side; same reply shape as `Query`.
    SqlStatement,
    /// Start a data feed.
    FeedStart,
    /// List running data feeds.
    FeedList,
    /// Stop a data feed.
    FeedKill,
    /// Write records; acknowledgement only.
    Write,
}

impl Method {
    /// The bare method name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Query => "Query",
            Method::SqlStatement => "SQLStatement",
            Method::FeedStart => "FeedStart",
            Method::FeedList => "FeedList",
            Method::FeedKill => "FeedKill",
            Method::Write => "Write",
        }
    }

    /// The service-qualified name sent on the wire.
    pub fn qualified_name(&self) -> &'static str {
        match self {
            Method::Query => "DataService.Query",
            Method::SqlStatement => "DataService.SQLStatement",
            Method::FeedStart => "DataService.FeedStart",
            Method::FeedList => "DataService.FeedList",
            Method::FeedKill => "DataService.FeedKill",
            Method::Write => "DataService.Write",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Method, Error> {
        match s {
            "Query" => Ok(Method::Query),
            "SQLStatement" => Ok(Method::SqlStatement),
            "FeedStart" => Ok(Method::FeedStart),
            "FeedList" => Ok(Method::FeedList),
            "FeedKill" => Ok(Method::FeedKill),
            "Write" => Ok(Method::Write),
            other => Err(Error::UnsupportedMethod(other.into())),
        }
    }
}

/// A tickstore RPC client.
///
/// Each call is one synchronous HTTP round trip against the service's `rpc`
/// endpoint. The client holds no state across calls, so it may be cloned
/// cheaply and shared between threads; concurrent calls are independent.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::blocking::Client,
    rpc_url: Url,
}

impl Client {
    /// Constructs a client targeting the service at `base_url`.
    ///
    /// Fails immediately if `base_url` is not a syntactically valid address;
    /// no network activity occurs until the first call.
    pub fn new(base_url: &str) -> Result<Client, Error> {
        let url = Url::parse(base_url)?;
        ClientConfig::new(url).build()
    }

    pub(crate) fn from_parts(inner: reqwest::blocking::Client, rpc_url: Url) -> Client {
        Client { inner, rpc_url }
    }

    /// Performs one RPC, dispatching on a method name string.
    ///
    /// Equivalent to [`Client::call_method`] after resolving `method`
    /// against the closed [`Method`] set; an unknown name is an error before
    /// any request is issued.
    pub fn call<P: Serialize>(
        &self,
        method: &str,
        params: Option<&P>,
    ) -> Result<Option<DatasetMap>, Error> {
        self.call_method(method.parse()?, params)
    }

    /// Performs one RPC against the service.
    ///
    /// `params` must be present; `None` is rejected before any network
    /// activity. Data-bearing methods (`Query`, `SQLStatement`, `FeedStart`,
    /// `FeedList`) resolve to `Some` dataset map — query replies through the
    /// packed-payload decoder, feed replies as a synthesized single-entry map
    /// under the sentinel key. Acknowledgement-only methods (`FeedKill`,
    /// `Write`) resolve to `None` on success. Transport errors surface
    /// verbatim; decode failures and server-reported errors short-circuit
    /// the call.
    pub fn call_method<P: Serialize>(
        &self,
        method: Method,
        params: Option<&P>,
    ) -> Result<Option<DatasetMap>, Error> {
        let params = params.ok_or(Error::NullParams)?;
        let body = envelope::encode_request(method.qualified_name(), params)?;
        debug!(method = method.name(), "issuing RPC call");
        let resp = self
            .inner
            .post(self.rpc_url.clone())
            .header(CONTENT_TYPE, "application/x-msgpack")
            .body(body)
            .send()?;

        match method {
            Method::Query | Method::SqlStatement => {
                let reply: MultiQueryReply = envelope::decode_reply(resp)?;
                Ok(Some(reply.decode()?))
            }
            Method::FeedStart => {
                let reply: FeedStartReply = envelope::decode_reply(resp)?;
                if !reply.error_text.is_empty() {
                    return Err(Error::Server(reply.error_text));
                }
                Ok(Some(singleton("pid", ColumnArray::I64(vec![reply.pid]))))
            }
            Method::FeedList => {
                let reply: FeedListReply = envelope::decode_reply(resp)?;
                Ok(Some(singleton(
                    "descriptions",
                    ColumnArray::Str(reply.descriptions),
                )))
            }
            Method::FeedKill => {
                let _: FeedKillReply = envelope::decode_reply(resp)?;
                Ok(None)
            }
            Method::Write => {
                let _: WriteReply = envelope::decode_reply(resp)?;
                Ok(None)
            }
        }
    }
}

/// Wraps one column into a single-entry map under the sentinel key, the
/// canonical rendering of non-tabular replies.
fn singleton(name: &str, values: ColumnArray) -> DatasetMap {
    let mut set = ColumnSet::new();
    set.insert(name, values);
    let mut map = DatasetMap::new();
    map.insert(DatasetKey::sentinel(), set);
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip() {
        for method in [
            Method::Query,
            Method::SqlStatement,
            Method::FeedStart,
            Method::FeedList,
            Method::FeedKill,
            Method::Write,
        ] {
            assert_eq!(method.name().parse::<Method>().unwrap(), method);
            assert_eq!(
                method.qualified_name(),
                format!("DataService.{}", method.name()),
            );
        }
    }

    #[test]
    fn unknown_methods_fail_without_a_request() {
        // The URL is unroutable; reaching the transport would fail loudly.
        let client = Client::new("http://192.0.2.1:1/").unwrap();
        match client.call("Bogus", Some(&1)) {
            Err(Error::UnsupportedMethod(name)) => {
                assert_eq!(name, "Bogus");
            }
            res => panic!("expected Error::UnsupportedMethod, got {res:?}"),
        }
        assert_eq!(
            "Bogus".parse::<Method>().unwrap_err().to_string(),
            "unsupported RPC response: Bogus",
        );
    }

    #[test]
    fn null_params_fail_without_a_request() {
        let client = Client::new("http://192.0.2.1:1/").unwrap();
        match client.call::<()>("Query", None) {
            Err(Error::NullParams) => (),
            res => panic!("expected Error::NullParams, got {res:?}"),
        }
        match client.call_method::<()>(Method::Write, None) {
            Err(Error::NullParams) => (),
            res => panic!("expected Error::NullParams, got {res:?}"),
        }
    }

    #[test]
    fn construction_validates_the_base_url() {
        match Client::new("::not a url::") {
            Err(Error::InvalidUrl(_)) => (),
            res => panic!("expected Error::InvalidUrl, got {res:?}"),
        }
        // Parses, but cannot serve as a base for the endpoint path.
        match Client::new("data:text/plain,hello") {
            Err(Error::InvalidUrl(_)) => (),
            res => panic!("expected Error::InvalidUrl, got {res:?}"),
        }
    }
}
