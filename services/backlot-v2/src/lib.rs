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

//! Backlot v2 REST API: request signing and chunked asset upload.
//!
//! ```no_run
//! use backlot_core::{Context, OsEnv};
//! use backlot_http_send_reqwest::ReqwestHttpSend;
//! use backlot_v2::{Client, Config, UploadMode, Uploader};
//!
//! # async fn example() -> backlot_core::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! let config = Config::new().from_env(&ctx)?;
//! let client = Client::from_config(ctx, &config)?;
//!
//! let file = tokio::fs::File::open("movie.mp4").await?;
//! Uploader::new(client)
//!     .upload("embed_code", file, UploadMode::Replacement)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::{signature, string_to_sign, RequestSigner};

mod client;
pub use client::Client;

mod asset;
pub use asset::{Asset, PreviewImage, TimeRestrictions};

mod upload;
pub use upload::{UploadHook, UploadMode, UploadPhase, UploadTarget, Uploader};

mod constants;
pub use constants::*;

#[cfg(test)]
mod testing;
