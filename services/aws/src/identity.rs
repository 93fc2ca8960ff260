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

//! Account id and partition discovery.

use crate::arn::parse_account_id_and_partition;
use crate::client::{CallerIdentity, Ec2Metadata, IamApi, StsApi};
use crate::constants::GET_USER_NOT_APPLICABLE_CODES;
use crate::{Config, CredentialSource};
use awsbase_core::{Context, Error, Result};
use std::fmt;
use std::sync::Arc;

/// The account and partition the active credentials belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityResult {
    /// Account id, empty only when discovery was skipped on purpose.
    pub account_id: String,
    /// Partition, like `aws` or `aws-cn`.
    pub partition: String,
}

/// A place account identity can be discovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    /// Instance metadata `iam/info`.
    Ec2Metadata,
    /// IAM `GetUser`.
    IamGetUser,
    /// IAM `ListRoles`.
    IamListRoles,
    /// STS `GetCallerIdentity`.
    StsGetCallerIdentity,
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverySource::Ec2Metadata => write!(f, "EC2 metadata"),
            DiscoverySource::IamGetUser => write!(f, "iam:GetUser"),
            DiscoverySource::IamListRoles => write!(f, "iam:ListRoles"),
            DiscoverySource::StsGetCallerIdentity => write!(f, "sts:GetCallerIdentity"),
        }
    }
}

/// Outcome of one discovery strategy.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The strategy found a non-empty account id.
    Success(IdentityResult),
    /// The strategy does not apply to these credentials.
    Skipped,
    /// The strategy failed.
    Failed(Error),
}

impl From<Result<IdentityResult>> for StrategyOutcome {
    fn from(result: Result<IdentityResult>) -> Self {
        match result {
            Ok(identity) => StrategyOutcome::Success(identity),
            Err(err) => StrategyOutcome::Failed(err),
        }
    }
}

/// A hard failure recorded while discovering the account identity.
#[derive(Debug)]
pub struct DiscoveryFailure {
    /// Strategy that failed.
    pub source: DiscoverySource,
    /// What went wrong.
    pub error: Error,
}

/// Every hard failure of an exhausted discovery, in the order strategies ran.
///
/// Attached as the source of the [`ErrorKind::DiscoveryExhausted`](awsbase_core::ErrorKind)
/// error, use [`discovery_failures`] to get them back.
#[derive(Debug, thiserror::Error)]
#[error("{}", render_failures(.0))]
pub struct DiscoveryFailures(pub Vec<DiscoveryFailure>);

fn render_failures(failures: &[DiscoveryFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.source, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Get the recorded failures out of a discovery exhausted error.
pub fn discovery_failures(err: &Error) -> Option<&[DiscoveryFailure]> {
    err.source_ref()?
        .downcast_ref::<DiscoveryFailures>()
        .map(|f| f.0.as_slice())
}

/// AccountIdentityResolver finds the account id and partition of the active credentials.
///
/// Strategies run one after another, cheapest first, and the first one producing
/// an account id wins:
///
/// 1. EC2 metadata `iam/info` for instance role credentials, IAM `GetUser` otherwise.
/// 2. STS `GetCallerIdentity`.
/// 3. IAM `ListRoles` limited to one role.
///
/// `GetUser` answering `AccessDenied`, `InvalidClientTokenId` or `ValidationError`
/// is expected for federated and assumed identities and counts as skipped, not failed.
#[derive(Debug, Clone)]
pub struct AccountIdentityResolver {
    ec2_metadata: Arc<dyn Ec2Metadata>,
    iam: Arc<dyn IamApi>,
    sts: Arc<dyn StsApi>,
}

impl AccountIdentityResolver {
    /// Create a resolver over the given service clients.
    pub fn new(
        ec2_metadata: Arc<dyn Ec2Metadata>,
        iam: Arc<dyn IamApi>,
        sts: Arc<dyn StsApi>,
    ) -> Self {
        Self {
            ec2_metadata,
            iam,
            sts,
        }
    }

    /// Resolve the account identity for credentials coming from `source`.
    ///
    /// A configured assume role ARN answers without any network call, as does
    /// `skip_requesting_account_id` which yields an empty account id.
    pub async fn resolve(
        &self,
        ctx: &Context,
        config: &Config,
        source: CredentialSource,
    ) -> Result<IdentityResult> {
        self.resolve_validated(ctx, config, source, None).await
    }

    /// Resolve the account identity, reusing the `GetCallerIdentity` answer from
    /// credential validation when there is one.
    ///
    /// The configured short cuts still win. A validated caller ARN carrying an account
    /// id answers without further calls, otherwise the strategies run as usual.
    pub async fn resolve_validated(
        &self,
        ctx: &Context,
        config: &Config,
        source: CredentialSource,
        caller: Option<&CallerIdentity>,
    ) -> Result<IdentityResult> {
        if let Some(arn) = config.assume_role_arn.as_deref().filter(|v| !v.is_empty()) {
            log::debug!("reading account id from assume role ARN");
            let (account_id, partition) = parse_account_id_and_partition(arn)
                .map_err(|e| e.with_context("field: assume_role_arn"))?;
            return Ok(IdentityResult {
                account_id,
                partition,
            });
        }

        if config.skip_requesting_account_id {
            return Ok(IdentityResult {
                account_id: String::new(),
                partition: config.partition().to_string(),
            });
        }

        if let Some(caller) = caller {
            match identity_from_arn(&caller.arn) {
                Ok(identity) => {
                    log::debug!(
                        "account id {} taken from credential validation",
                        identity.account_id
                    );
                    return Ok(identity);
                }
                Err(err) => log::debug!("validated caller ARN is not usable: {err}"),
            }
        }

        let first = match source {
            CredentialSource::Ec2Role => DiscoverySource::Ec2Metadata,
            CredentialSource::Other => DiscoverySource::IamGetUser,
        };

        let mut failures = Vec::new();
        for strategy in [
            first,
            DiscoverySource::StsGetCallerIdentity,
            DiscoverySource::IamListRoles,
        ] {
            match self.attempt(ctx, strategy).await {
                StrategyOutcome::Success(identity) => {
                    log::debug!(
                        "account id {} discovered via {strategy}",
                        identity.account_id
                    );
                    return Ok(identity);
                }
                StrategyOutcome::Skipped => {
                    log::debug!("account id discovery via {strategy} does not apply, skipped");
                }
                StrategyOutcome::Failed(error) => {
                    log::debug!("account id discovery via {strategy} failed: {error}");
                    failures.push(DiscoveryFailure {
                        source: strategy,
                        error,
                    });
                }
            }
        }

        let failures = DiscoveryFailures(failures);
        Err(
            Error::discovery_exhausted(format!("failed to determine account id: {failures}"))
                .with_source(failures),
        )
    }

    /// Run a single discovery strategy.
    pub async fn attempt(&self, ctx: &Context, strategy: DiscoverySource) -> StrategyOutcome {
        match strategy {
            DiscoverySource::Ec2Metadata => self
                .ec2_metadata
                .iam_info(ctx)
                .await
                .and_then(|info| identity_from_arn(&info.instance_profile_arn))
                .into(),
            DiscoverySource::IamGetUser => match self.iam.get_user(ctx).await {
                Err(err) if is_get_user_not_applicable(&err) => StrategyOutcome::Skipped,
                result => result.and_then(|user| identity_from_arn(&user.arn)).into(),
            },
            DiscoverySource::StsGetCallerIdentity => self
                .sts
                .get_caller_identity(ctx)
                .await
                .and_then(|identity| identity_from_arn(&identity.arn))
                .into(),
            DiscoverySource::IamListRoles => self
                .iam
                .list_roles(ctx, 1)
                .await
                .and_then(|roles| match roles.first() {
                    Some(role) => identity_from_arn(&role.arn),
                    None => Err(Error::empty_response("IAM ListRoles returned no roles")),
                })
                .into(),
        }
    }
}

fn is_get_user_not_applicable(err: &Error) -> bool {
    err.code()
        .is_some_and(|code| GET_USER_NOT_APPLICABLE_CODES.contains(&code))
}

fn identity_from_arn(arn: &str) -> Result<IdentityResult> {
    let (account_id, partition) = parse_account_id_and_partition(arn)?;
    if account_id.is_empty() {
        return Err(Error::empty_response("ARN carries no account id")
            .with_context(format!("arn: {arn}")));
    }

    Ok(IdentityResult {
        account_id,
        partition,
    })
}
