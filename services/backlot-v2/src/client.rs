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

use bytes::Bytes;
use http::uri::{Authority, Scheme};
use http::{Method, Request, Response, StatusCode, Uri};
use log::debug;
use serde::de::DeserializeOwned;

use crate::credential::Credential;
use crate::provide_credential::DefaultCredentialProvider;
use crate::sign_request::RequestSigner;
use crate::Config;
use backlot_core::{Context, Error, Result, Signer};

/// Client issues signed requests against a Backlot API endpoint.
///
/// Every call is signed with the body it carries and sent through the
/// [`Context`] transport. Responses are returned as is; callers decide which
/// status codes they accept.
#[derive(Clone, Debug)]
pub struct Client {
    signer: Signer<Credential>,
    scheme: Scheme,
    authority: Authority,
    expires_in: Duration,
}

impl Client {
    /// Create a new client from its parts.
    ///
    /// `endpoint` must be an absolute url such as `https://api.ooyala.com`;
    /// any path it carries is ignored.
    pub fn new(signer: Signer<Credential>, endpoint: &str, expires_in: Duration) -> Result<Self> {
        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("invalid endpoint: {endpoint}")).with_source(e)
        })?;
        let (Some(scheme), Some(authority)) = (uri.scheme(), uri.authority()) else {
            return Err(Error::config_invalid(format!(
                "endpoint must be an absolute url, got {endpoint}"
            )));
        };

        Ok(Self {
            signer,
            scheme: scheme.clone(),
            authority: authority.clone(),
            expires_in,
        })
    }

    /// Create a client with the default credential chain for `config`.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let signer = Signer::new(
            ctx,
            DefaultCredentialProvider::from_config(config),
            RequestSigner::new(),
        );
        Self::new(signer, config.endpoint(), config.expires_in())
    }

    /// Get the context used to send requests.
    pub fn context(&self) -> &Context {
        self.signer.context()
    }

    /// Sign and send a request.
    ///
    /// `path` may carry a query string; `api_key`, `expires` and `signature`
    /// already present in it are kept.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: impl Into<Bytes>,
    ) -> Result<Response<Bytes>> {
        let body = body.into();
        let uri = if path.starts_with('/') {
            format!("{}://{}{path}", self.scheme, self.authority)
        } else {
            format!("{}://{}/{path}", self.scheme, self.authority)
        };

        let (mut parts, ()) = Request::builder()
            .method(method)
            .uri(uri)
            .body(())?
            .into_parts();
        self.signer
            .sign(&mut parts, &body, Some(self.expires_in))
            .await?;

        debug!("{} {}", parts.method, parts.uri);
        self.context()
            .http_send(Request::from_parts(parts, body))
            .await
    }

    /// Send a signed `GET`.
    pub async fn get(&self, path: &str) -> Result<Response<Bytes>> {
        self.send(Method::GET, path, Bytes::new()).await
    }

    /// Send a signed `POST`.
    pub async fn post(&self, path: &str, body: impl Into<Bytes>) -> Result<Response<Bytes>> {
        self.send(Method::POST, path, body).await
    }

    /// Send a signed `PUT`.
    pub async fn put(&self, path: &str, body: impl Into<Bytes>) -> Result<Response<Bytes>> {
        self.send(Method::PUT, path, body).await
    }

    /// Send a signed `PATCH`.
    pub async fn patch(&self, path: &str, body: impl Into<Bytes>) -> Result<Response<Bytes>> {
        self.send(Method::PATCH, path, body).await
    }

    /// Send a signed `DELETE`.
    pub async fn delete(&self, path: &str) -> Result<Response<Bytes>> {
        self.send(Method::DELETE, path, Bytes::new()).await
    }
}

/// Fail with `make("[status] body")` unless the response has `expected` status.
pub(crate) fn check_status(
    resp: &Response<Bytes>,
    expected: StatusCode,
    make: impl FnOnce(String) -> Error,
) -> Result<()> {
    let status = resp.status();
    if status == expected {
        return Ok(());
    }

    let body = String::from_utf8_lossy(resp.body());
    Err(make(format!("[{status}] {body}")).with_status(status))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::unexpected("failed to decode response body").with_source(e))
}
