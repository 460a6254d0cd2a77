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

use std::time::Duration;

use chrono::Utc;

use crate::{Error, Result};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Unix timestamp of `time + expires_in`.
///
/// Fails if the duration can't be represented or the sum overflows.
pub fn expires_at(time: DateTime, expires_in: Duration) -> Result<i64> {
    let delta = chrono::TimeDelta::from_std(expires_in)
        .map_err(|e| Error::request_invalid("invalid expiration duration").with_source(e))?;
    time.checked_add_signed(delta)
        .map(|t| t.timestamp())
        .ok_or_else(|| Error::request_invalid("expiration time out of range"))
}

/// Create datetime from unix timestamp in seconds.
pub fn from_timestamp(secs: i64) -> Result<DateTime> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| Error::unexpected(format!("timestamp {secs} out of range")))
}
