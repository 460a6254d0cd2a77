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

use std::time::Duration;

// Env values used in backlot services.
pub const BACKLOT_SECRET_KEY: &str = "BACKLOT_SECRET_KEY";
pub const BACKLOT_API_KEY: &str = "BACKLOT_API_KEY";
pub const BACKLOT_ENDPOINT: &str = "BACKLOT_ENDPOINT";
pub const BACKLOT_EXPIRES_IN: &str = "BACKLOT_EXPIRES_IN";

/// Default endpoint for the Backlot REST API.
pub const BACKLOT_DEFAULT_ENDPOINT: &str = "https://api.ooyala.com";
/// Caching endpoint for repeated Backlot REST API reads.
pub const BACKLOT_CDN_ENDPOINT: &str = "https://cdn-api.ooyala.com";
/// Default endpoint for the Live API.
pub const LIVE_ENDPOINT: &str = "https://live.ooyala.com";
/// Default endpoint for the Rights Locker API.
pub const RIGHTS_LOCKER_ENDPOINT: &str = "https://rl.ooyala.com";

/// How long a signed request stays valid unless configured otherwise.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(15 * 60 * 60);

// Query keys managed by the signer.
pub const QUERY_API_KEY: &str = "api_key";
pub const QUERY_EXPIRES: &str = "expires";
pub const QUERY_SIGNATURE: &str = "signature";

/// Length of a signature: a base64 SHA256 digest without its `=` padding.
pub const SIGNATURE_LEN: usize = 43;

/// Query key carrying the chunk size of an upload target.
pub const TARGET_FILESIZE: &str = "filesize";
