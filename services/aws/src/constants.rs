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

// Provider names reported on credentials.
pub const STATIC_PROVIDER_NAME: &str = "StaticProvider";
pub const EC2_ROLE_PROVIDER_NAME: &str = "EC2RoleProvider";

// Headers used by the instance metadata service.
pub const X_AWS_EC2_METADATA_TOKEN: &str = "x-aws-ec2-metadata-token";
pub const X_AWS_EC2_METADATA_TOKEN_TTL_SECONDS: &str = "x-aws-ec2-metadata-token-ttl-seconds";

// Default endpoints.
pub const DEFAULT_EC2_METADATA_ENDPOINT: &str = "http://169.254.169.254";

// Query protocol API versions.
pub const IAM_API_VERSION: &str = "2010-05-08";
pub const STS_API_VERSION: &str = "2011-06-15";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

// Error codes returned by IAM `GetUser` for identities it does not describe,
// for example federated or assumed-role sessions.
pub const GET_USER_NOT_APPLICABLE_CODES: &[&str] =
    &["AccessDenied", "InvalidClientTokenId", "ValidationError"];

// Error codes meaning the signed request itself is no longer valid.
pub const EXPIRED_TOKEN_CODES: &[&str] = &["ExpiredToken", "ExpiredTokenException", "RequestExpired"];

// Resolver failure messages, matched once the http client flattened them.
pub const HOST_RESOLUTION_MESSAGES: &[&str] = &[
    "no such host",
    "dns error",
    "failed to lookup address",
    "Name or service not known",
    "nodename nor servname provided",
];

// Error codes worth retrying under the default policy.
pub const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottledException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "PriorRequestNotComplete",
];
