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

use backlot_core::{utils::Redact, Error, Result, SigningCredential};

/// Credential for the Backlot API.
///
/// The secret key only ever feeds the signature digest; it is never sent.
#[derive(Clone)]
pub struct Credential {
    /// Public api key, sent as the `api_key` query parameter.
    pub api_key: String,
    /// Secret key, prepended to the canonical string to sign.
    pub secret_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Check the keys are present and not swapped.
    ///
    /// Api keys are `<partner code>.<id>`, secret keys carry no dot.
    pub fn check(&self) -> Result<()> {
        if self.api_key.is_empty() || self.secret_key.is_empty() {
            return Err(Error::credential_invalid(
                "both api key and secret key are required",
            ));
        }
        if self.secret_key.contains('.') && !self.api_key.contains('.') {
            return Err(Error::credential_invalid(
                "incorrect order of keys, first should be secret key, then api key",
            ));
        }
        Ok(())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("secret_key", &Redact::full(&self.secret_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}
