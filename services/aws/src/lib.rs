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

//! AWS credential and account identity resolution.
//!
//! This crate turns a [`Config`] into working credentials and finds out which
//! account and partition they belong to:
//!
//! - [`CredentialsBridge`] caches credentials from any [`ProvideCredential`](awsbase_core::ProvideCredential)
//!   and refreshes them once they expire or are expired on purpose.
//! - [`AccountIdentityResolver`] discovers the account id through EC2 metadata, IAM
//!   and STS, cheapest source first.
//! - [`classify_retry`] decides whether a failed call is worth another attempt.
//!
//! Requests are never signed here; callers plug a [`SignRequest`](awsbase_core::SignRequest)
//! implementation into the [`Session`].
//!
//! ## Example
//!
//! ```no_run
//! use awsbase_aws::{Config, Credential, Session};
//! use awsbase_core::{Context, Result, SignRequest};
//! use awsbase_http_send_reqwest::ReqwestHttpSend;
//! use std::sync::Arc;
//!
//! async fn connect(signer: Arc<dyn SignRequest<Credential = Credential>>) -> Result<()> {
//!     let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//!     let config = Config::default()
//!         .with_region("us-west-2")
//!         .with_static_credentials("access_key_id", "secret_access_key");
//!
//!     let session = Session::build(&ctx, &config, signer).await?;
//!     println!("account: {}", session.identity().account_id);
//!     Ok(())
//! }
//! ```

mod arn;
pub use arn::{parse_account_id_and_partition, Arn};

mod bridge;
pub use bridge::CredentialsBridge;

pub mod client;

mod config;
pub use config::{Config, Endpoints};

mod constants;

mod credential;
pub use credential::{Credential, CredentialSource};

pub mod endpoint;

mod identity;
pub use identity::{
    discovery_failures, AccountIdentityResolver, DiscoveryFailure, DiscoveryFailures,
    DiscoverySource, IdentityResult, StrategyOutcome,
};

mod provide_credential;
pub use provide_credential::{Ec2RoleCredentialProvider, StaticCredentialProvider};

mod retry;
pub use retry::{
    classify_retry, is_expired_token, is_network_failure, send_with_retry, RetryClassifier,
    DEFAULT_MAX_RETRIES, MAX_NETWORK_RETRY_COUNT,
};

mod session;
pub use session::Session;
