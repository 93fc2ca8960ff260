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

use awsbase_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

const ARN_PREFIX: &str = "arn";
const ARN_SECTIONS: usize = 6;

/// Amazon Resource Name, `arn:partition:service:region:account-id:resource`.
///
/// The resource is kept verbatim and may contain further `:` or `/`.
/// Partition values are opaque, no registry lookup happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    /// Partition, like `aws` or `aws-us-gov`.
    pub partition: String,
    /// Service namespace, like `iam` or `sts`.
    pub service: String,
    /// Region, empty for global services.
    pub region: String,
    /// Owning account id, empty for some resource types.
    pub account_id: String,
    /// Everything after the fifth separator.
    pub resource: String,
}

impl FromStr for Arn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let sections: Vec<&str> = s.splitn(ARN_SECTIONS, ':').collect();
        if sections.len() != ARN_SECTIONS {
            return Err(Error::malformed_arn("not enough sections in ARN")
                .with_context(format!("arn: {s}")));
        }
        if sections[0] != ARN_PREFIX {
            return Err(Error::malformed_arn("ARN must start with `arn:`")
                .with_context(format!("arn: {s}")));
        }

        Ok(Arn {
            partition: sections[1].to_string(),
            service: sections[2].to_string(),
            region: sections[3].to_string(),
            account_id: sections[4].to_string(),
            resource: sections[5].to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// Parse an ARN into `(account_id, partition)`.
pub fn parse_account_id_and_partition(arn: &str) -> Result<(String, String)> {
    let arn: Arn = arn.parse()?;
    Ok((arn.account_id, arn.partition))
}
