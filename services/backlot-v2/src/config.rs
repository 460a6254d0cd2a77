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

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use super::constants::*;
use backlot_core::{utils::Redact, Context, Error, Result};

/// Config carries all the configuration for the Backlot v2 API.
#[derive(Clone, Default)]
pub struct Config {
    /// `secret_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BACKLOT_SECRET_KEY`]
    pub secret_key: Option<String>,
    /// `api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BACKLOT_API_KEY`]
    pub api_key: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BACKLOT_ENDPOINT`]
    /// - falls back to [`BACKLOT_DEFAULT_ENDPOINT`]
    pub endpoint: Option<String>,
    /// `expires_in` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BACKLOT_EXPIRES_IN`] in seconds
    /// - falls back to [`DEFAULT_EXPIRES_IN`]
    pub expires_in: Option<Duration>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set secret_key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set api_key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set expires_in
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(BACKLOT_SECRET_KEY) {
            self.secret_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BACKLOT_API_KEY) {
            self.api_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BACKLOT_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if self.expires_in.is_none() {
            if let Some(v) = ctx.env_var(BACKLOT_EXPIRES_IN) {
                let secs = v.trim().parse::<u64>().map_err(|e| {
                    Error::config_invalid(format!("{BACKLOT_EXPIRES_IN} must be seconds, got {v:?}"))
                        .with_source(e)
                })?;
                self.expires_in = Some(Duration::from_secs(secs));
            }
        }

        Ok(self)
    }

    /// The endpoint to send requests to.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(BACKLOT_DEFAULT_ENDPOINT)
    }

    /// How long signed requests stay valid.
    pub fn expires_in(&self) -> Duration {
        self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &self.secret_key.as_deref().map(Redact::full))
            .field("api_key", &self.api_key.as_ref().map(Redact::from))
            .field("endpoint", &self.endpoint)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
