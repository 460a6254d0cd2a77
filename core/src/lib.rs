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

//! Building blocks shared by the backlot crates.
//!
//! A [`Context`] says how to reach the network and the environment. A
//! [`Signer`] combines a [`ProvideCredential`] that finds keys with a
//! [`SignRequest`] that turns them into a signed request, and caches the
//! credential between calls.
//!
//! Services plug their own credential type in:
//!
//! ```no_run
//! use async_trait::async_trait;
//! use backlot_core::{Context, ProvideCredential, Result, SignRequest, Signer, SigningCredential};
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)]
//! struct Token(String);
//!
//! impl SigningCredential for Token {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct FixedToken;
//!
//! #[async_trait]
//! impl ProvideCredential for FixedToken {
//!     type Credential = Token;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
//!         Ok(Some(Token("pcode.apikey".to_string())))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct AppendToken;
//!
//! #[async_trait]
//! impl SignRequest for AppendToken {
//!     type Credential = Token;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &mut http::request::Parts,
//!         _body: &[u8],
//!         token: Option<&Token>,
//!         _expires_in: Option<Duration>,
//!     ) -> Result<()> {
//!         if let Some(token) = token {
//!             req.uri = format!("{}?api_key={}", req.uri.path(), token.0).parse()?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), FixedToken, AppendToken);
//! let (mut parts, _) = http::Request::get("/v2/assets").body(())?.into_parts();
//! signer.sign(&mut parts, b"", None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
