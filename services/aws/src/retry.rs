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

//! Retry classification for calls made on behalf of a session.

use crate::constants::{EXPIRED_TOKEN_CODES, HOST_RESOLUTION_MESSAGES};
use awsbase_core::{Error, ErrorKind, Result};
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Attempts after which a persistent network failure stops being retried.
///
/// Independent of, and usually much lower than, the configured maximum retries which
/// is tuned for service throttling.
pub const MAX_NETWORK_RETRY_COUNT: u32 = 9;

/// Default maximum number of retries for a single call.
pub const DEFAULT_MAX_RETRIES: usize = 25;

const MIN_BACKOFF: Duration = Duration::from_millis(30);
const MAX_BACKOFF: Duration = Duration::from_secs(20);

/// Decide whether a failed call may be attempted again.
///
/// `attempt_count` is the number of retries already made for this call.
///
/// 1. Expired security tokens or request timestamps are never retried: resending the
///    same signed request cannot succeed.
/// 2. Network failures stop once `attempt_count` reaches `max_network_retries`.
/// 3. Everything else follows the error's own retryable flag.
///
/// This is a pure function; counting attempts and sleeping between them belong to the
/// caller.
pub fn classify_retry(err: &Error, attempt_count: u32, max_network_retries: u32) -> bool {
    if is_expired_token(err) {
        return false;
    }

    if is_network_failure(err) && attempt_count >= max_network_retries {
        return false;
    }

    err.is_retryable()
}

/// Check whether the error reports an expired token or request timestamp.
pub fn is_expired_token(err: &Error) -> bool {
    err.code()
        .is_some_and(|code| EXPIRED_TOKEN_CODES.contains(&code))
}

/// Check whether the error happened before any response was received.
pub fn is_network_failure(err: &Error) -> bool {
    if err.kind() == ErrorKind::Network {
        return true;
    }

    err.source_ref().is_some_and(|source| {
        source.chain().any(|cause| {
            let refused_or_unresolved = cause.downcast_ref::<std::io::Error>().is_some_and(|io| {
                matches!(
                    io.kind(),
                    std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
                )
            });
            refused_or_unresolved || is_host_resolution_failure(&cause.to_string())
        })
    })
}

/// Resolver failures surface as plain messages once they leave the http client.
fn is_host_resolution_failure(msg: &str) -> bool {
    HOST_RESOLUTION_MESSAGES.iter().any(|m| msg.contains(m))
}

/// RetryClassifier is the retry policy hook installed once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryClassifier {
    max_retries: usize,
    max_network_retries: u32,
}

impl Default for RetryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, MAX_NETWORK_RETRY_COUNT)
    }
}

impl RetryClassifier {
    /// Create a classifier allowing `max_retries` retries in general and
    /// `max_network_retries` for network failures.
    pub fn new(max_retries: usize, max_network_retries: u32) -> Self {
        Self {
            max_retries,
            max_network_retries,
        }
    }

    /// Maximum number of retries for one call.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Retry ceiling for network failures.
    pub fn max_network_retries(&self) -> u32 {
        self.max_network_retries
    }

    /// Decide whether a call that failed with `err` after `attempts_so_far` retries
    /// should be retried.
    pub fn should_retry(&self, err: &Error, attempts_so_far: u32) -> bool {
        (attempts_so_far as usize) < self.max_retries
            && classify_retry(err, attempts_so_far, self.max_network_retries)
    }
}

/// Run `operation`, retrying failures the classifier allows with exponential backoff.
///
/// `name` identifies the operation in logs, like `sts:GetCallerIdentity`.
pub async fn send_with_retry<T, F, Fut>(
    classifier: &RetryClassifier,
    name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = AtomicU32::new(0);
    let backoff = ExponentialBuilder::default()
        .with_min_delay(MIN_BACKOFF)
        .with_max_delay(MAX_BACKOFF)
        .with_max_times(classifier.max_retries)
        .with_jitter();

    (|| {
        attempts.fetch_add(1, Ordering::Relaxed);
        operation()
    })
    .retry(backoff)
    .when(|err: &Error| {
        let retries_so_far = attempts.load(Ordering::Relaxed).saturating_sub(1);
        classifier.should_retry(err, retries_so_far)
    })
    .notify(|err: &Error, dur: Duration| {
        log::debug!("retrying {name} in {dur:?} after error: {err}");
    })
    .await
}
