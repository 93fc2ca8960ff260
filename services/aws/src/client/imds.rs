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

use super::{Ec2Metadata, IamInfo};
use crate::constants::*;
use crate::retry::{send_with_retry, RetryClassifier};
use crate::Credential;
use async_trait::async_trait;
use awsbase_core::time::{now, parse_rfc3339, DateTime};
use awsbase_core::{Context, Error, Result};
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

/// Seconds a metadata token stays valid, 6h is what AWS recommends.
const TOKEN_TTL_SECONDS: i64 = 21600;
/// Seconds before the token's expiry at which it is fetched again.
const TOKEN_REFRESH_SECONDS: i64 = 600;

/// Client for the EC2 instance metadata service, using IMDSv2 session tokens.
#[derive(Debug, Clone)]
pub struct ImdsClient {
    endpoint: String,
    retry: RetryClassifier,
    token: Arc<Mutex<(String, DateTime)>>,
}

impl Default for ImdsClient {
    fn default() -> Self {
        Self::new(DEFAULT_EC2_METADATA_ENDPOINT)
    }
}

impl ImdsClient {
    /// Create a client talking to `endpoint`, like `http://169.254.169.254`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            retry: RetryClassifier::default(),
            token: Arc::new(Mutex::new((String::new(), DateTime::default()))),
        }
    }

    /// Set the retry policy used for metadata calls.
    pub fn with_retry_classifier(mut self, retry: RetryClassifier) -> Self {
        self.retry = retry;
        self
    }

    /// The metadata endpoint in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn load_token(&self, ctx: &Context) -> Result<String> {
        let cached = self.token.lock().expect("lock poisoned").clone();
        if cached.1 > now() {
            return Ok(cached.0);
        }

        let url = format!("{}/latest/api/token", self.endpoint);
        let req = http::Request::builder()
            .uri(&url)
            .method(Method::PUT)
            .header(CONTENT_LENGTH, "0")
            .header(X_AWS_EC2_METADATA_TOKEN_TTL_SECONDS, TOKEN_TTL_SECONDS.to_string())
            .body(Bytes::new())
            .map_err(|e| {
                Error::request_invalid("failed to build IMDS token request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;

        let resp = ctx.http_send_as_string(req).await.map_err(|e| {
            e.with_context(format!("endpoint: {}", self.endpoint))
                .with_context("hint: check if running on EC2 instance")
        })?;

        if resp.status() != StatusCode::OK {
            return Err(self.parse_error("fetch_imds_token", resp.status(), resp.body()));
        }

        let token = resp.into_body();
        let expires_in = now()
            + chrono::TimeDelta::try_seconds(TOKEN_TTL_SECONDS - TOKEN_REFRESH_SECONDS)
                .expect("in bounds");
        *self.token.lock().expect("lock poisoned") = (token.clone(), expires_in);

        Ok(token)
    }

    async fn get(&self, ctx: &Context, operation: &str, path: &str) -> Result<String> {
        let token = self.load_token(ctx).await?;

        let url = format!("{}{path}", self.endpoint);
        let req = http::Request::builder()
            .uri(&url)
            .method(Method::GET)
            .header(X_AWS_EC2_METADATA_TOKEN, &token)
            .body(Bytes::new())
            .map_err(|e| {
                Error::request_invalid(format!("failed to build IMDS {operation} request"))
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;

        let resp = ctx
            .http_send_as_string(req)
            .await
            .map_err(|e| e.with_context(format!("operation: {operation}")))?;

        if resp.status() != StatusCode::OK {
            return Err(self.parse_error(operation, resp.status(), resp.body()));
        }
        Ok(resp.into_body())
    }

    fn parse_error(&self, operation: &str, status: StatusCode, body: &str) -> Error {
        let err = match status {
            StatusCode::UNAUTHORIZED => {
                // The token was revoked or expired early, drop it so the retry fetches a new one.
                *self.token.lock().expect("lock poisoned") = (String::new(), DateTime::default());
                Error::credential_invalid("IMDS rejected the metadata token").set_retryable(true)
            }
            StatusCode::FORBIDDEN => {
                Error::permission_denied("IMDS access forbidden")
                    .with_context("hint: check the instance metadata options")
            }
            StatusCode::NOT_FOUND => Error::service("IMDS resource not found")
                .with_context("hint: check if an IAM role is attached to the instance"),
            s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
                Error::service(format!("IMDS unavailable: {s}")).set_retryable(true)
            }
            s => Error::service(format!("IMDS returned unexpected status {s}")),
        };

        err.with_context(format!("operation: {operation}"))
            .with_context(format!("status: {status}"))
            .with_context(format!("body_length: {}", body.len()))
    }

    /// Fetch the credentials of the role attached to the instance.
    pub async fn security_credentials(&self, ctx: &Context) -> Result<Credential> {
        send_with_retry(&self.retry, "imds:security_credentials", || {
            self.security_credentials_once(ctx)
        })
        .await
    }

    async fn security_credentials_once(&self, ctx: &Context) -> Result<Credential> {
        let listing = self
            .get(
                ctx,
                "list_instance_profiles",
                "/latest/meta-data/iam/security-credentials/",
            )
            .await?;

        let role_name = listing.lines().next().unwrap_or_default().trim().to_string();
        if role_name.is_empty() {
            return Err(
                Error::config_invalid("no IAM role attached to EC2 instance")
                    .with_context("hint: attach an IAM role to your EC2 instance"),
            );
        }

        let content = self
            .get(
                ctx,
                "fetch_credentials",
                &format!("/latest/meta-data/iam/security-credentials/{role_name}"),
            )
            .await
            .map_err(|e| e.with_context(format!("role: {role_name}")))?;

        let resp: SecurityCredentialsResponse = serde_json::from_str(&content).map_err(|e| {
            Error::unexpected("failed to parse IMDS credentials response")
                .with_source(e)
                .with_context(format!("response_length: {}", content.len()))
                .with_context(format!("role: {role_name}"))
        })?;

        match resp.code.as_str() {
            "Success" => {}
            "AssumeRoleUnauthorizedAccess" => {
                return Err(Error::permission_denied(format!(
                    "EC2 instance not authorized to assume role: {}",
                    resp.message
                ))
                .with_code(resp.code.as_str())
                .with_context(format!("role: {role_name}"))
                .with_context("hint: check if the IAM role has a trust relationship with EC2"));
            }
            code if code.contains("Expired") => {
                return Err(Error::credential_invalid(format!(
                    "IMDS credentials expired: {}",
                    resp.message
                ))
                .with_code(code)
                .with_context(format!("role: {role_name}")));
            }
            _ => {
                return Err(Error::service(format!(
                    "IMDS returned error: [{}] {}",
                    resp.code, resp.message
                ))
                .with_code(resp.code.as_str())
                .with_context(format!("role: {role_name}")));
            }
        }

        let expires_in = parse_rfc3339(&resp.expiration).map_err(|e| {
            e.with_context("field: Expiration")
                .with_context(format!("role: {role_name}"))
        })?;

        Ok(Credential {
            access_key_id: resp.access_key_id,
            secret_access_key: resp.secret_access_key,
            session_token: Some(resp.token).filter(|t| !t.is_empty()),
            provider_name: EC2_ROLE_PROVIDER_NAME.to_string(),
            expires_in: Some(expires_in),
        })
    }

    async fn iam_info_once(&self, ctx: &Context) -> Result<IamInfo> {
        let content = self
            .get(ctx, "iam_info", "/latest/meta-data/iam/info")
            .await?;

        let resp: IamInfoResponse = serde_json::from_str(&content).map_err(|e| {
            Error::unexpected("failed to parse IMDS iam/info response")
                .with_source(e)
                .with_context(format!("response_length: {}", content.len()))
        })?;

        if resp.code != "Success" {
            return Err(Error::service(format!(
                "IMDS iam/info returned error: [{}] {}",
                resp.code, resp.message
            ))
            .with_code(resp.code));
        }

        Ok(IamInfo {
            code: resp.code,
            instance_profile_arn: resp.instance_profile_arn,
            instance_profile_id: resp.instance_profile_id,
        })
    }
}

#[async_trait]
impl Ec2Metadata for ImdsClient {
    async fn iam_info(&self, ctx: &Context) -> Result<IamInfo> {
        send_with_retry(&self.retry, "imds:iam_info", || self.iam_info_once(ctx)).await
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SecurityCredentialsResponse {
    access_key_id: String,
    secret_access_key: String,
    token: String,
    expiration: String,

    code: String,
    message: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct IamInfoResponse {
    code: String,
    message: String,
    instance_profile_arn: String,
    instance_profile_id: String,
}
