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

//! Shared plumbing for services speaking the AWS query protocol (IAM, STS).

use crate::constants::{FORM_CONTENT_TYPE, THROTTLING_CODES};
use crate::retry::{is_expired_token, send_with_retry, RetryClassifier};
use crate::{Credential, CredentialsBridge};
use awsbase_core::utils::redact;
use awsbase_core::{Context, Error, Result, SignRequest};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use quick_xml::de;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::{self, Debug};
use std::sync::Arc;

pub(crate) struct QueryClient {
    service: &'static str,
    version: &'static str,
    endpoint: String,
    bridge: Arc<CredentialsBridge>,
    signer: Arc<dyn SignRequest<Credential = Credential>>,
    retry: RetryClassifier,
}

impl Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    pub(crate) fn new(
        service: &'static str,
        version: &'static str,
        endpoint: impl Into<String>,
        bridge: Arc<CredentialsBridge>,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
        retry: RetryClassifier,
    ) -> Self {
        Self {
            service,
            version,
            endpoint: endpoint.into(),
            bridge,
            signer,
            retry,
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `action` with `params`, retrying as the classifier allows.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let name = format!("{}:{action}", self.service);
        send_with_retry(&self.retry, &name, || self.call_once(ctx, action, params)).await
    }

    async fn call_once<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        // The serializer is not Send, so it must be gone before the first await.
        let body = {
            let mut form = form_urlencoded::Serializer::new(String::new());
            form.append_pair("Action", action)
                .append_pair("Version", self.version);
            for (key, value) in params {
                form.append_pair(key, value);
            }
            form.finish()
        };

        let url = format!("{}/", self.endpoint.trim_end_matches('/'));
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::request_invalid(format!("failed to build {}:{action} request", self.service))
                    .with_source(e)
                    .with_context(format!("endpoint: {url}"))
            })?;

        let cred = self.bridge.get_credentials(ctx).await?;
        let (mut parts, body) = req.into_parts();
        self.signer.sign_request(ctx, &mut parts, &cred).await?;
        let req = http::Request::from_parts(parts, body);

        let resp = ctx.http_send_as_string(req).await.map_err(|e| {
            e.with_context(format!("operation: {}:{action}", self.service))
                .with_context(format!("endpoint: {url}"))
        })?;

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("x-amzn-requestid")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = resp.into_body();
        log::debug!(
            "{}:{action} responded {status}: {}",
            self.service,
            redact(&body)
        );

        if !status.is_success() {
            let err = parse_query_error(self.service, action, status, &body, request_id.as_deref());
            if is_expired_token(&err) {
                // Only fresh credentials can produce a request that will be accepted.
                log::warn!(
                    "{}:{action} rejected expired credentials from {}",
                    self.service,
                    cred.provider_name
                );
                self.bridge.expire();
            }
            return Err(err);
        }

        de::from_str(&body).map_err(|e| {
            Error::unexpected(format!("failed to parse {}:{action} response", self.service))
                .with_source(e)
                .with_context(format!("response_length: {}", body.len()))
        })
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorResponse {
    error: ErrorDetail,
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Turn a non-2xx query protocol response into an [`Error`] carrying the service code.
pub(crate) fn parse_query_error(
    service: &str,
    action: &str,
    status: StatusCode,
    body: &str,
    request_id: Option<&str>,
) -> Error {
    let resp: ErrorResponse = de::from_str(body).unwrap_or_default();
    let detail = resp.error;

    let mut err = if detail.code.is_empty() {
        Error::service(format!("{service}:{action} failed with status {status}"))
    } else {
        Error::service(format!(
            "{service}:{action} failed: [{}] {}",
            detail.code, detail.message
        ))
        .with_code(&detail.code)
    };

    let retryable = status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || THROTTLING_CODES.contains(&detail.code.as_str());
    err = err
        .with_context(format!("status: {status}"))
        .set_retryable(retryable);

    let request_id = request_id
        .map(|s| s.to_string())
        .or_else(|| Some(resp.request_id).filter(|s| !s.is_empty()));
    if let Some(request_id) = request_id {
        err = err.with_context(format!("request_id: {request_id}"));
    }
    err
}
