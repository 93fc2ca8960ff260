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

//! Default endpoints, derived from the region prefix.
//!
//! This is a prefix heuristic, not a partition table. Callers needing exotic
//! endpoints set them on [`Config`](crate::Config).

use awsbase_core::{Error, Result};

/// Guess the partition a region belongs to.
pub fn partition_for_region(region: Option<&str>) -> &'static str {
    match region.unwrap_or_default() {
        r if r.starts_with("cn-") => "aws-cn",
        r if r.starts_with("us-gov-") => "aws-us-gov",
        r if r.starts_with("us-isob-") => "aws-iso-b",
        r if r.starts_with("us-iso-") => "aws-iso",
        _ => "aws",
    }
}

fn dns_suffix(partition: &str) -> &'static str {
    match partition {
        "aws-cn" => "amazonaws.com.cn",
        "aws-iso" => "c2s.ic.gov",
        "aws-iso-b" => "sc2s.sgov.gov",
        _ => "amazonaws.com",
    }
}

/// Get the IAM endpoint. IAM is global within a partition.
pub fn iam_endpoint(region: Option<&str>) -> String {
    match partition_for_region(region) {
        "aws-cn" => "https://iam.cn-north-1.amazonaws.com.cn".to_string(),
        "aws-us-gov" => "https://iam.us-gov.amazonaws.com".to_string(),
        "aws-iso" => "https://iam.us-iso-east-1.c2s.ic.gov".to_string(),
        "aws-iso-b" => "https://iam.us-isob-east-1.sc2s.sgov.gov".to_string(),
        _ => "https://iam.amazonaws.com".to_string(),
    }
}

/// Get the STS endpoint.
///
/// Only the commercial partition has a global STS endpoint, every other partition
/// and `use_regional` use `sts.{region}.{dns_suffix}`.
pub fn sts_endpoint(region: Option<&str>, use_regional: bool) -> Result<String> {
    let partition = partition_for_region(region);
    if !use_regional && partition == "aws" {
        return Ok("https://sts.amazonaws.com".to_string());
    }

    let region = region
        .filter(|r| !r.is_empty())
        .ok_or_else(|| Error::config_invalid("regional STS endpoint requires region"))?;
    Ok(format!("https://sts.{region}.{}", dns_suffix(partition)))
}
