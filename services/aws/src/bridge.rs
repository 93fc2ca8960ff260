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

use crate::Credential;
use awsbase_core::time::{now, DateTime};
use awsbase_core::{Context, Error, ProvideCredential, Result, SigningCredential};
use chrono::TimeDelta;
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// CredentialsBridge turns a credential provider into a cacheable credential holder.
///
/// The wrapped provider is asked for credentials only when nothing usable is cached.
/// The credential it returns reports its own expiry; `None` means the credential never
/// expires. Callers get a narrow contract:
///
/// - [`get_credentials`](Self::get_credentials): cached credentials, or a fresh fetch
/// - [`is_expired`](Self::is_expired): whether the next call will fetch
/// - [`expires_at`](Self::expires_at): expiry of the cached credential
/// - [`expire`](Self::expire): force the next call to fetch
///
/// ## Locking
///
/// Cached state lives behind a `std::sync::Mutex` that is only held for short,
/// non-async critical sections. Fetches are serialised by a separate async refresh
/// gate, so at most one provider call is in flight per bridge and callers that
/// queue behind it receive the value it fetched.
///
/// Dropping a `get_credentials` future cancels the fetch and caches nothing.
pub struct CredentialsBridge {
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    /// The only lock guarding cached credentials.
    state: Mutex<CachedCredentialState>,
    /// Serialises provider fetches, never guards state.
    refresh: tokio::sync::Mutex<()>,
    expiry_window: TimeDelta,
}

#[derive(Debug, Default)]
struct CachedCredentialState {
    cached: Option<Credential>,
    cached_expiry: Option<DateTime>,
    forced_expired: bool,
    /// Bumped by every `expire()`, lets a fetch detect an expire that raced it.
    generation: u64,
}

impl CachedCredentialState {
    fn is_expired(&self, window: TimeDelta) -> bool {
        if self.cached.is_none() || self.forced_expired {
            return true;
        }

        match self.cached_expiry {
            None => false,
            Some(expiry) => match now().checked_add_signed(window) {
                Some(deadline) => expiry <= deadline,
                None => true,
            },
        }
    }

    fn fresh(&self, window: TimeDelta) -> Option<Credential> {
        if self.is_expired(window) {
            None
        } else {
            self.cached.clone()
        }
    }
}

impl Debug for CredentialsBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsBridge")
            .field("provider", &self.provider)
            .field("expiry_window", &self.expiry_window)
            .finish_non_exhaustive()
    }
}

impl CredentialsBridge {
    /// Wrap `provider` into a new bridge with an empty cache.
    pub fn new(provider: impl ProvideCredential<Credential = Credential>) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Wrap an already shared provider.
    pub fn from_arc(provider: Arc<dyn ProvideCredential<Credential = Credential>>) -> Self {
        Self {
            provider,
            state: Mutex::new(CachedCredentialState::default()),
            refresh: tokio::sync::Mutex::new(()),
            expiry_window: TimeDelta::zero(),
        }
    }

    /// Treat cached credentials as expired `window` before their reported expiry.
    ///
    /// Defaults to zero: credentials are expired once their expiry is at or before now.
    pub fn with_expiry_window(mut self, window: Duration) -> Self {
        self.expiry_window = TimeDelta::from_std(window).unwrap_or_else(|_| {
            log::warn!("expiry window {window:?} is out of range, ignoring it");
            TimeDelta::zero()
        });
        self
    }

    fn state(&self) -> MutexGuard<'_, CachedCredentialState> {
        self.state.lock().expect("lock poisoned")
    }

    /// Get the current credentials, fetching from the provider when needed.
    ///
    /// Failures are returned as [`ErrorKind::CredentialRetrieval`](awsbase_core::ErrorKind)
    /// and never cached; the bridge does not retry on its own.
    pub async fn get_credentials(&self, ctx: &Context) -> Result<Credential> {
        let cached = self.state().fresh(self.expiry_window);
        if let Some(cred) = cached {
            return Ok(cred);
        }

        let _gate = self.refresh.lock().await;

        // Someone else may have refreshed while we waited on the gate.
        let generation = {
            let state = self.state();
            if let Some(cred) = state.fresh(self.expiry_window) {
                return Ok(cred);
            }
            state.generation
        };

        log::debug!("refreshing credentials from provider {:?}", self.provider);
        let cred = self
            .provider
            .provide_credential(ctx)
            .await
            .map_err(|e| {
                let retryable = e.is_retryable();
                Error::credential_retrieval("failed to retrieve credentials from provider")
                    .with_source(e)
                    .set_retryable(retryable)
            })?
            .ok_or_else(|| {
                Error::credential_retrieval("credential provider returned no credentials")
            })?;

        if !cred.is_valid() {
            return Err(Error::credential_retrieval(
                "credential provider returned incomplete credentials",
            )
            .with_context(format!("provider: {}", cred.provider_name)));
        }

        let mut state = self.state();
        state.cached_expiry = cred.expires_in;
        state.cached = Some(cred.clone());
        if state.generation == generation {
            state.forced_expired = false;
        }
        Ok(cred)
    }

    /// Check whether the next [`get_credentials`](Self::get_credentials) will fetch.
    ///
    /// Never triggers a fetch itself.
    pub fn is_expired(&self) -> bool {
        self.state().is_expired(self.expiry_window)
    }

    /// Expiry of the cached credentials.
    ///
    /// `None` means either nothing is cached yet or the credentials never expire; it
    /// must not be read as "already expired".
    pub fn expires_at(&self) -> Option<DateTime> {
        self.state().cached_expiry
    }

    /// Force the next [`get_credentials`](Self::get_credentials) to fetch.
    ///
    /// The cached value stays in place, so readers racing the refresh still see a
    /// complete credential.
    pub fn expire(&self) {
        let mut state = self.state();
        state.forced_expired = true;
        state.generation = state.generation.wrapping_add(1);
    }
}
