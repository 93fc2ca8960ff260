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

//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;

/// DateTime used by awsbase, always in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Parse time from RFC3339, like `2019-11-09T13:34:41Z`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    Ok(chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| {
            Error::unexpected(format!("failed to parse rfc3339 time: {s}")).with_source(e)
        })?
        .with_timezone(&Utc))
}

/// Format time into RFC3339: `2022-03-13T07:20:04Z`
pub fn format_rfc3339(t: DateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let t = parse_rfc3339("2019-11-09T13:34:41Z").expect("must parse");
        assert_eq!(t, Utc.with_ymd_and_hms(2019, 11, 9, 13, 34, 41).unwrap());
        assert_eq!(format_rfc3339(t), "2019-11-09T13:34:41Z");

        let t = parse_rfc3339("2019-11-09T15:34:41+02:00").expect("must parse offset");
        assert_eq!(format_rfc3339(t), "2019-11-09T13:34:41Z");

        assert!(parse_rfc3339("not a time").is_err());
    }
}
