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

use crate::client::ImdsClient;
use crate::Credential;
use async_trait::async_trait;
use awsbase_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

/// Ec2RoleCredentialProvider loads the credentials of the IAM role attached to the
/// EC2 instance from the instance metadata service.
///
/// Credentials it returns are reported with the `EC2RoleProvider` provider name and
/// carry the expiration announced by the metadata service.
#[derive(Debug, Clone)]
pub struct Ec2RoleCredentialProvider {
    imds: Arc<ImdsClient>,
}

impl Ec2RoleCredentialProvider {
    /// Create a provider reading from `imds`.
    pub fn new(imds: Arc<ImdsClient>) -> Self {
        Self { imds }
    }
}

#[async_trait]
impl ProvideCredential for Ec2RoleCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let cred = self.imds.security_credentials(ctx).await?;
        log::debug!(
            "loaded EC2 role credentials expiring at {:?}",
            cred.expires_in
        );
        Ok(Some(cred))
    }
}
