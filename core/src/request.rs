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

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme, absent for bare paths.
    pub scheme: Option<Scheme>,
    /// HTTP authority, absent for bare paths.
    pub authority: Option<Authority>,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded, in request order.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme,
            authority: uri.authority,
            path: paq.path().to_string(),
            query: parse_query(paq.query()),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Build a signing context from a bare `path?query` string.
    ///
    /// A path without leading `/` is treated as rooted.
    pub fn from_path_and_query(method: Method, path_and_query: &str) -> Result<Self> {
        let raw: Cow<str> = if path_and_query.starts_with('/') {
            Cow::Borrowed(path_and_query)
        } else {
            Cow::Owned(format!("/{path_and_query}"))
        };
        let paq = PathAndQuery::from_str(&raw)
            .map_err(|e| Error::request_invalid(format!("invalid path: {raw}")).with_source(e))?;

        Ok(SigningRequest {
            method,
            scheme: None,
            authority: None,
            path: paq.path().to_string(),
            query: parse_query(paq.query()),
            headers: HeaderMap::new(),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method.clone();
        parts.uri = {
            let paq = self.path_and_query();
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = self.scheme;
            uri_parts.authority = self.authority;
            uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Render `path?query` with the query sorted by key and form encoded.
    ///
    /// Pairs sharing a key keep their relative order.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let mut query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.sort_by(|a, b| a.0.cmp(b.0));

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();

        let mut s = String::with_capacity(self.path.len() + encoded.len() + 1);
        s.push_str(&self.path);
        s.push('?');
        s.push_str(&encoded);
        s
    }

    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Cow<str> {
        percent_encoding::percent_decode_str(&self.path).decode_utf8_lossy()
    }

    /// Check whether the query carries the given key, whatever its value.
    #[inline]
    pub fn query_contains(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }

    /// Get the first value of the given query key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Push a query pair only if the key is not present yet.
    ///
    /// Returns `true` if the pair was added.
    pub fn query_push_if_absent(
        &mut self,
        key: impl Into<String>,
        value: impl FnOnce() -> String,
    ) -> bool {
        let key = key.into();
        if self.query_contains(&key) {
            return false;
        }
        self.query.push((key, value()));
        true
    }

    /// Replace every value of the given key with a single pair.
    pub fn query_set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.query.retain(|(k, _)| *k != key);
        self.query.push((key, value.into()));
    }

    /// First value of every query key, ordered by key bytes.
    pub fn query_first_values(&self) -> BTreeMap<&str, &str> {
        let mut m = BTreeMap::new();
        for (k, v) in &self.query {
            m.entry(k.as_str()).or_insert(v.as_str());
        }
        m
    }
}

fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|v| {
            form_urlencoded::parse(v.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}
