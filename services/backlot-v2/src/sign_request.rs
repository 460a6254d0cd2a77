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

//! Backlot request signer.
use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use log::debug;

use crate::constants::*;
use crate::credential::Credential;
use backlot_core::hash::base64_sha256;
use backlot_core::time::{expires_at, now, DateTime};
use backlot_core::utils::redact_within;
use backlot_core::{Context, Error, Result, SignRequest, SigningRequest};

/// RequestSigner that implements Backlot v2 request signing.
///
/// The signature is carried in the query string together with `api_key` and
/// `expires`; nothing is added to the headers.
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    /// Sign a bare `path?query` without any host.
    ///
    /// Returns the signed `path?query`, with the query keys sorted.
    pub fn sign_path(
        &self,
        cred: &Credential,
        method: &str,
        path_and_query: &str,
        body: &[u8],
        expires_in: Option<Duration>,
    ) -> Result<String> {
        let method = parse_method(method)?;
        let mut req = SigningRequest::from_path_and_query(method, path_and_query)?;
        self.sign(&mut req, cred, body, expires_in)?;
        Ok(req.path_and_query())
    }

    fn sign(
        &self,
        req: &mut SigningRequest,
        cred: &Credential,
        body: &[u8],
        expires_in: Option<Duration>,
    ) -> Result<()> {
        cred.check()?;

        let expires = expires_at(self.get_time(), expires_in.unwrap_or(DEFAULT_EXPIRES_IN))?;
        req.query_push_if_absent(QUERY_API_KEY, || cred.api_key.clone());
        req.query_push_if_absent(QUERY_EXPIRES, || expires.to_string());

        if req.query_contains(QUERY_SIGNATURE) {
            debug!("request already carries a signature, keeping it");
            return Ok(());
        }

        let string_to_sign = string_to_sign(req, &cred.secret_key, body);
        let signature = signature(&string_to_sign);
        req.query_push(QUERY_SIGNATURE, signature);
        Ok(())
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        parts: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;

        parts.method = parse_method(parts.method.as_str())?;
        let mut req = SigningRequest::build(parts)?;
        self.sign(&mut req, cred, body, expires_in)?;
        req.apply(parts)
    }
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|e| Error::request_invalid(format!("invalid method: {method}")).with_source(e))
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// SecretKey + UPPERCASE(Method) + Path +
/// key1=value1 + key2=value2 + ... +
/// Body
/// ```
///
/// Query keys are sorted by their bytes and only the first value of a
/// repeated key is used. There are no separators between pairs.
pub fn string_to_sign(req: &SigningRequest, secret_key: &str, body: &[u8]) -> Vec<u8> {
    let mut s = String::new();
    s.push_str(secret_key);
    s.push_str(&req.method.as_str().to_ascii_uppercase());
    s.push_str(&req.path_percent_decoded());
    for (k, v) in req.query_first_values() {
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }

    debug!(
        "string to sign: {} (+{} body bytes)",
        redact_within(&s, secret_key),
        body.len()
    );

    let mut bs = s.into_bytes();
    bs.extend_from_slice(body);
    bs
}

/// Base64 SHA256 digest truncated to [`SIGNATURE_LEN`] characters.
///
/// The truncation drops the trailing `=` of the padded encoding, which the
/// service expects.
pub fn signature(string_to_sign: &[u8]) -> String {
    let mut s = base64_sha256(string_to_sign);
    s.truncate(SIGNATURE_LEN);
    s
}
