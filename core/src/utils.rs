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

//! Helpers for keeping keys out of logs.

use std::fmt::{Debug, Formatter};

/// Debug wrapper that masks a key.
///
/// Public keys of 12 characters or more keep three characters at each end,
/// e.g. `329***qh5`; anything shorter is printed as `***`. Secrets built with
/// [`Redact::full`] are always printed as `***`.
pub struct Redact<'a> {
    value: &'a str,
    full: bool,
}

impl<'a> Redact<'a> {
    /// Mask every character of `value`.
    pub fn full(value: &'a str) -> Self {
        Redact { value, full: true }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact { value, full: false }
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::from(value.as_str())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let chars: Vec<char> = self.value.chars().collect();
        match chars.len() {
            0 => f.write_str("EMPTY"),
            n if n < 12 || self.full => f.write_str("***"),
            n => {
                let head: String = chars[..3].iter().collect();
                let tail: String = chars[n - 3..].iter().collect();
                write!(f, "{head}***{tail}")
            }
        }
    }
}

/// Replace every occurrence of `secret` inside `s` with `***`.
///
/// The canonical string to sign starts with the secret key, so it goes
/// through here before it is logged.
pub fn redact_within(s: &str, secret: &str) -> String {
    if secret.is_empty() {
        return s.to_string();
    }
    s.replace(secret, &format!("{:?}", Redact::full(secret)))
}
