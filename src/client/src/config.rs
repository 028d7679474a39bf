// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use url::Url;

use crate::client::Client;
use crate::error::Error;

/// Configuration for a [`Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    url: Url,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Constructs a new `ClientConfig` targeting the service at `url`.
    pub fn new(url: Url) -> ClientConfig {
        ClientConfig { url, timeout: None }
    }

    /// Applies a timeout covering the full round trip of each call.
    ///
    /// No timeout is applied by default; deadlines are the transport
    /// configuration's concern, never threaded through individual calls.
    pub fn timeout(mut self, timeout: Duration) -> ClientConfig {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`Client`].
    ///
    /// Fails if the configured URL cannot serve as a base for the RPC
    /// endpoint path. No network activity occurs.
    pub fn build(self) -> Result<Client, Error> {
        let rpc_url = self.url.join("rpc")?;
        let inner = reqwest::blocking::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(self.timeout)
            .build()?;
        Ok(Client::from_parts(inner, rpc_url))
    }
}
