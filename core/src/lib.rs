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

//! Core components for resolving AWS credentials and account identity.
//!
//! This crate provides the foundational types and traits for the awsbase ecosystem.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the HTTP client used for every network call
//! - **Traits**: Abstract interfaces for credential loading ([`ProvideCredential`]) and
//!   the request signing seam ([`SignRequest`])
//! - **Error**: A single [`Error`] type carrying an [`ErrorKind`], service error codes
//!   and a retryable flag consumed by retry classification
//!
//! ## Utilities
//!
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: Redaction of secrets and AWS key ids

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;
pub mod utils;

mod context;
pub use context::Context;
mod http;
pub use http::HttpSend;
pub use http::NoopHttpSend;

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod error;
pub use error::{Error, ErrorKind, Result};
