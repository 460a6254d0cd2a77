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

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::debug;

use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};

/// Signer pairs a credential provider with a request builder.
///
/// The credential is loaded lazily on the first `sign` and cached until it
/// stops being valid or [`Signer::invalidate`] is called. Clones share the
/// cache.
#[derive(Clone, Debug)]
pub struct Signer<C: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = C>>,
    builder: Arc<dyn SignRequest<Credential = C>>,
    cached: Arc<Mutex<Option<C>>>,
}

impl<C: SigningCredential> Signer<C> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = C>,
        builder: impl SignRequest<Credential = C>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            builder: Arc::new(builder),
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Context this signer sends requests through.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Drop the cached credential so the next `sign` loads a fresh one.
    pub fn invalidate(&self) -> Result<()> {
        *self.cache()? = None;
        Ok(())
    }

    /// Sign `req` in place with the cached or freshly loaded credential.
    pub async fn sign(
        &self,
        req: &mut http::request::Parts,
        body: &[u8],
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let credential = self.credential().await?;
        self.builder
            .sign_request(&self.ctx, req, body, credential.as_ref(), expires_in)
            .await
    }

    async fn credential(&self) -> Result<Option<C>> {
        let cached = self.cache()?.clone();
        if cached.is_valid() {
            return Ok(cached);
        }

        debug!("no valid credential cached, asking provider {:?}", self.provider);
        let loaded = self.provider.provide_credential(&self.ctx).await?;
        if loaded.is_none() {
            debug!("credential provider returned nothing");
        }
        *self.cache()? = loaded.clone();
        Ok(loaded)
    }

    fn cache(&self) -> Result<MutexGuard<'_, Option<C>>> {
        self.cached
            .lock()
            .map_err(|_| Error::unexpected("credential cache lock poisoned"))
    }
}
