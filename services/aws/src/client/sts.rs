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

use super::query::QueryClient;
use super::{CallerIdentity, StsApi};
use crate::constants::STS_API_VERSION;
use crate::retry::RetryClassifier;
use crate::{Credential, CredentialsBridge};
use async_trait::async_trait;
use awsbase_core::{Context, Result, SignRequest};
use serde::Deserialize;
use std::sync::Arc;

/// StsClient calls STS with credentials taken from a [`CredentialsBridge`].
#[derive(Debug)]
pub struct StsClient {
    query: QueryClient,
}

impl StsClient {
    /// Create a new StsClient.
    pub fn new(
        endpoint: impl Into<String>,
        bridge: Arc<CredentialsBridge>,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
        retry: RetryClassifier,
    ) -> Self {
        Self {
            query: QueryClient::new("sts", STS_API_VERSION, endpoint, bridge, signer, retry),
        }
    }

    /// The STS endpoint in use.
    pub fn endpoint(&self) -> &str {
        self.query.endpoint()
    }
}

#[async_trait]
impl StsApi for StsClient {
    async fn get_caller_identity(&self, ctx: &Context) -> Result<CallerIdentity> {
        let resp: GetCallerIdentityResponse =
            self.query.call(ctx, "GetCallerIdentity", &[]).await?;
        let result = resp.result;

        Ok(CallerIdentity {
            account: result.account,
            arn: result.arn,
            user_id: result.user_id,
        })
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct GetCallerIdentityResponse {
    #[serde(rename = "GetCallerIdentityResult")]
    result: GetCallerIdentityResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct GetCallerIdentityResult {
    arn: String,
    user_id: String,
    account: String,
}
