// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Reqwest-based HTTP client implementation for awsbase.
//!
//! Timeouts, TLS, proxies and CA bundles are configured on the [`reqwest::Client`]
//! handed to [`ReqwestHttpSend::new`]; awsbase does not build transports itself.
//!
//! ```no_run
//! use awsbase_core::Context;
//! use awsbase_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! let client = reqwest::Client::builder()
//!     .connect_timeout(Duration::from_secs(1))
//!     .build()
//!     .unwrap();
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use awsbase_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests with a [`reqwest::Client`].
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Map a reqwest failure into our error taxonomy.
///
/// Connect failures cover refused connections, DNS resolution and dial errors.
fn classify(err: reqwest::Error, url: &str) -> Error {
    if err.is_connect() {
        Error::network("failed to connect")
            .with_context(format!("url: {url}"))
            .with_source(err)
    } else if err.is_timeout() {
        Error::unexpected("request timed out")
            .with_context(format!("url: {url}"))
            .with_source(err)
            .set_retryable(true)
    } else if err.is_builder() {
        Error::request_invalid("failed to build request")
            .with_context(format!("url: {url}"))
            .with_source(err)
    } else {
        Error::unexpected("failed to send request")
            .with_context(format!("url: {url}"))
            .with_source(err)
            .set_retryable(true)
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let url = req.uri().to_string();
        let req = Request::try_from(req).map_err(|e| classify(e, &url))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| classify(e, &url))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| classify(e, &url))?;
        log::debug!("{url} responded with {}", parts.status);
        Ok(http::Response::from_parts(parts, bs))
    }
}
