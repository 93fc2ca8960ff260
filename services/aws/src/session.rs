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

use crate::client::{IamClient, ImdsClient, StsApi, StsClient};
use crate::retry::RetryClassifier;
use crate::{
    AccountIdentityResolver, Config, Credential, CredentialSource, CredentialsBridge,
    IdentityResult,
};
use awsbase_core::{Context, Error, ProvideCredential, Result, SignRequest};
use std::sync::Arc;

/// Session bundles resolved credentials, the discovered account identity and the
/// clients built around them.
#[derive(Debug)]
pub struct Session {
    bridge: Arc<CredentialsBridge>,
    source: CredentialSource,
    identity: IdentityResult,
    retry: RetryClassifier,
    imds: Arc<ImdsClient>,
    iam: Arc<IamClient>,
    sts: Arc<StsClient>,
}

impl Session {
    /// Build a session from `config`.
    ///
    /// Static keys are used when configured, the EC2 instance role otherwise. Requests
    /// to IAM and STS are signed by `signer`.
    pub async fn build(
        ctx: &Context,
        config: &Config,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
    ) -> Result<Self> {
        let imds = Arc::new(
            ImdsClient::new(config.ec2_metadata_endpoint())
                .with_retry_classifier(config.retry_classifier()),
        );
        let (provider, source) = config.resolve_credential_provider(imds.clone())?;
        Self::assemble(ctx, config, provider, source, imds, signer).await
    }

    /// Build a session around a caller supplied credential provider.
    pub async fn build_with_provider(
        ctx: &Context,
        config: &Config,
        provider: Arc<dyn ProvideCredential<Credential = Credential>>,
        source: CredentialSource,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
    ) -> Result<Self> {
        let imds = Arc::new(
            ImdsClient::new(config.ec2_metadata_endpoint())
                .with_retry_classifier(config.retry_classifier()),
        );
        Self::assemble(ctx, config, provider, source, imds, signer).await
    }

    async fn assemble(
        ctx: &Context,
        config: &Config,
        provider: Arc<dyn ProvideCredential<Credential = Credential>>,
        source: CredentialSource,
        imds: Arc<ImdsClient>,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
    ) -> Result<Self> {
        let retry = config.retry_classifier();
        let bridge = Arc::new(CredentialsBridge::from_arc(provider));
        let iam = Arc::new(IamClient::new(
            config.iam_endpoint(),
            bridge.clone(),
            signer.clone(),
            retry,
        ));
        let sts = Arc::new(StsClient::new(
            config.sts_endpoint()?,
            bridge.clone(),
            signer,
            retry,
        ));

        let cred = bridge.get_credentials(ctx).await?;
        log::debug!("using credentials from {}", cred.provider_name);

        let caller = if config.skip_credentials_validation {
            None
        } else {
            let caller = sts.get_caller_identity(ctx).await.map_err(|e| {
                Error::credential_invalid("failed to validate credentials")
                    .with_context(format!("provider: {}", cred.provider_name))
                    .with_context(format!("endpoint: {}", sts.endpoint()))
                    .with_source(e)
            })?;
            Some(caller)
        };

        let resolver = AccountIdentityResolver::new(imds.clone(), iam.clone(), sts.clone());
        let identity = resolver
            .resolve_validated(ctx, config, source, caller.as_ref())
            .await?;

        Ok(Self {
            bridge,
            source,
            identity,
            retry,
            imds,
            iam,
            sts,
        })
    }

    /// Current credentials, refreshed through the bridge when expired.
    pub async fn credentials(&self, ctx: &Context) -> Result<Credential> {
        self.bridge.get_credentials(ctx).await
    }

    /// The credentials bridge shared by every client of this session.
    pub fn bridge(&self) -> &Arc<CredentialsBridge> {
        &self.bridge
    }

    /// Account identity. The account id is empty when discovery was skipped.
    pub fn identity(&self) -> &IdentityResult {
        &self.identity
    }

    /// Where the credentials come from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Retry policy used for every call of this session.
    pub fn retry_classifier(&self) -> RetryClassifier {
        self.retry
    }

    /// Instance metadata client.
    pub fn imds(&self) -> &Arc<ImdsClient> {
        &self.imds
    }

    /// IAM client.
    pub fn iam(&self) -> &Arc<IamClient> {
        &self.iam
    }

    /// STS client.
    pub fn sts(&self) -> &Arc<StsClient> {
        &self.sts
    }
}
