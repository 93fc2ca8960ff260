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

//! Utility functions and types.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

/// Matches AWS access key ids and other unique identifiers: a fixed four character
/// prefix followed by sixteen upper-case alphanumerics.
static AWS_KEY_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:A3T[A-Z0-9]|AKIA|ASIA|AIDA|AROA|AIPA|ANPA|ANVA|APKA|AGPA)[A-Z0-9]{16}\b")
        .expect("key id regex must be valid")
});

/// Number of characters kept visible at each end of a masked value.
const VISIBLE: usize = 4;

/// Mask everything but the first and last four characters with `*`.
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= VISIBLE * 2 {
        return "*".repeat(chars.len());
    }

    let mut masked = String::with_capacity(value.len());
    masked.extend(&chars[..VISIBLE]);
    masked.extend(std::iter::repeat('*').take(chars.len() - VISIBLE * 2));
    masked.extend(&chars[chars.len() - VISIBLE..]);
    masked
}

/// Redact every AWS key id found in `text`.
///
/// Matches keep their first and last four characters, the interior is replaced by `*`.
/// Everything else in `text` is returned untouched.
pub fn redact(text: &str) -> String {
    AWS_KEY_ID
        .replace_all(text, |caps: &regex::Captures| mask(&caps[0]))
        .into_owned()
}

/// Redacts a secret value in `Debug` output.
///
/// - Empty values print as `EMPTY`.
/// - Values shorter than 12 characters are entirely redacted.
/// - Longer values keep their first and last four characters.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            f.write_str(&mask(self.0))
        }
    }
}
