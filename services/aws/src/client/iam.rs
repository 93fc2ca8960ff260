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
use super::{IamApi, IamRole, IamUser};
use crate::constants::IAM_API_VERSION;
use crate::retry::RetryClassifier;
use crate::{Credential, CredentialsBridge};
use async_trait::async_trait;
use awsbase_core::{Context, Result, SignRequest};
use serde::Deserialize;
use std::sync::Arc;

/// IamClient calls IAM with credentials taken from a [`CredentialsBridge`].
#[derive(Debug)]
pub struct IamClient {
    query: QueryClient,
}

impl IamClient {
    /// Create a new IamClient.
    pub fn new(
        endpoint: impl Into<String>,
        bridge: Arc<CredentialsBridge>,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
        retry: RetryClassifier,
    ) -> Self {
        Self {
            query: QueryClient::new("iam", IAM_API_VERSION, endpoint, bridge, signer, retry),
        }
    }

    /// The IAM endpoint in use.
    pub fn endpoint(&self) -> &str {
        self.query.endpoint()
    }
}

#[async_trait]
impl IamApi for IamClient {
    async fn get_user(&self, ctx: &Context) -> Result<IamUser> {
        let resp: GetUserResponse = self.query.call(ctx, "GetUser", &[]).await?;
        let user = resp.result.user;

        Ok(IamUser {
            arn: user.arn,
            user_name: user.user_name,
            user_id: user.user_id,
        })
    }

    async fn list_roles(&self, ctx: &Context, max_items: u32) -> Result<Vec<IamRole>> {
        let max_items = max_items.to_string();
        let resp: ListRolesResponse = self
            .query
            .call(ctx, "ListRoles", &[("MaxItems", &max_items)])
            .await?;

        Ok(resp
            .result
            .roles
            .member
            .into_iter()
            .map(|r| IamRole {
                arn: r.arn,
                role_name: r.role_name,
            })
            .collect())
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct GetUserResponse {
    #[serde(rename = "GetUserResult")]
    result: GetUserResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct GetUserResult {
    user: UserXml,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct UserXml {
    arn: String,
    user_name: String,
    user_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct ListRolesResponse {
    #[serde(rename = "ListRolesResult")]
    result: ListRolesResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ListRolesResult {
    roles: RolesXml,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct RolesXml {
    member: Vec<RoleXml>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RoleXml {
    arn: String,
    role_name: String,
}
