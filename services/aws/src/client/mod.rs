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

//! Read-only clients for the services consulted during identity discovery.
//!
//! Each service is a trait so discovery can run against any implementation; the
//! HTTP implementations here speak just enough of each API for the calls we make.

mod iam;
pub use iam::IamClient;
mod imds;
pub use imds::ImdsClient;
mod query;
mod sts;
pub use sts::StsClient;

use async_trait::async_trait;
use awsbase_core::{Context, Result};
use std::fmt::Debug;

/// Answer of the instance metadata `iam/info` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamInfo {
    /// Status code reported by the metadata service, `Success` when usable.
    pub code: String,
    /// ARN of the instance profile attached to the instance.
    pub instance_profile_arn: String,
    /// Id of the instance profile.
    pub instance_profile_id: String,
}

/// The IAM user behind the current credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamUser {
    /// User ARN.
    pub arn: String,
    /// User name.
    pub user_name: String,
    /// Unique user id.
    pub user_id: String,
}

/// An IAM role visible to the current credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamRole {
    /// Role ARN.
    pub arn: String,
    /// Role name.
    pub role_name: String,
}

/// Answer of STS `GetCallerIdentity`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Account id of the caller.
    pub account: String,
    /// ARN of the calling identity.
    pub arn: String,
    /// Unique id of the calling identity.
    pub user_id: String,
}

/// The EC2 instance metadata service.
#[async_trait]
pub trait Ec2Metadata: Debug + Send + Sync + 'static {
    /// Fetch IAM information about the instance profile.
    async fn iam_info(&self, ctx: &Context) -> Result<IamInfo>;
}

/// Read operations of IAM.
#[async_trait]
pub trait IamApi: Debug + Send + Sync + 'static {
    /// Describe the IAM user the credentials belong to.
    async fn get_user(&self, ctx: &Context) -> Result<IamUser>;

    /// List at most `max_items` roles.
    async fn list_roles(&self, ctx: &Context, max_items: u32) -> Result<Vec<IamRole>>;
}

/// Read operations of STS.
#[async_trait]
pub trait StsApi: Debug + Send + Sync + 'static {
    /// Describe the identity whose credentials are used to call the operation.
    async fn get_caller_identity(&self, ctx: &Context) -> Result<CallerIdentity>;
}
