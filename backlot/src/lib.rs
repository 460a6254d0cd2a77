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

//! Signed requests and concurrent chunked uploads for the Backlot media API.
//!
//! This crate re-exports [`backlot_core`] at its root and the Backlot v2
//! service under [`v2`].
//!
//! ```no_run
//! use backlot::v2::{Client, Config, UploadMode, Uploader};
//!
//! # async fn example() -> backlot::Result<()> {
//! let ctx = backlot::default_context();
//! let config = Config::new().from_env(&ctx)?;
//! let uploader = Uploader::new(Client::from_config(ctx, &config)?);
//!
//! let file = tokio::fs::File::open("movie.mp4").await?;
//! uploader.upload("embed_code", file, UploadMode::New).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use backlot_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::{default_context, default_context_with_client};

/// Backlot v2 REST API.
pub mod v2 {
    pub use backlot_v2::*;
}
