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

use awsbase_core::time::DateTime;
use awsbase_core::utils::Redact;
use awsbase_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access_key and secret_key.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Session token for aws services.
    pub session_token: Option<String>,
    /// Name of the provider that produced this credential.
    pub provider_name: String,
    /// Expiration time for this credential, `None` for long-lived keys.
    pub expires_in: Option<DateTime>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("provider_name", &self.provider_name)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

/// Where the active credentials come from, as far as identity discovery cares.
///
/// Decided once while resolving configuration and handed to the
/// [`AccountIdentityResolver`](crate::AccountIdentityResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Role credentials served by the EC2 instance metadata service.
    Ec2Role,
    /// Anything else: static keys, profiles, assumed roles, web identity.
    Other,
}

impl CredentialSource {
    /// Derive the source from a provider name reported on a credential.
    pub fn from_provider_name(name: &str) -> Self {
        if name == crate::constants::EC2_ROLE_PROVIDER_NAME {
            CredentialSource::Ec2Role
        } else {
            CredentialSource::Other
        }
    }
}
