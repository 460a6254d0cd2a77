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

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::{check_status, parse_json};
use crate::Client;
use backlot_core::{Error, Result};

/// Asset is a Backlot media resource, identified by its embed code.
///
/// Only the embed code matters to the upload engine; the rest is passed
/// through to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    /// Display name.
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    /// Name of the file the asset was created from.
    #[serde(deserialize_with = "null_as_empty")]
    pub original_file_name: String,
    /// Unique identifier assigned by the service.
    #[serde(deserialize_with = "null_as_empty")]
    pub embed_code: String,
    /// `video`, `remote_asset`, `live_stream`...
    #[serde(deserialize_with = "null_as_empty")]
    pub asset_type: String,
    /// Availability window, if any.
    pub time_restrictions: Option<TimeRestrictions>,
    /// Creation time as returned by the service.
    #[serde(deserialize_with = "null_as_empty")]
    pub created_at: String,
    /// Last update time as returned by the service.
    #[serde(deserialize_with = "null_as_empty")]
    pub updated_at: String,
}

/// Time based availability of an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRestrictions {
    /// Restriction type, such as `range`.
    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    pub kind: String,
    /// Start of the window.
    #[serde(deserialize_with = "null_as_empty")]
    pub start_date: String,
    /// End of the window.
    #[serde(deserialize_with = "null_as_empty")]
    pub end_date: String,
}

/// Preview image attached to an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewImage {
    /// Image identifier.
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    /// Public url of the stored image.
    #[serde(deserialize_with = "null_as_empty")]
    pub url: String,
}

#[derive(Serialize)]
struct CreateAssetRequest<'a> {
    name: &'a str,
    file_name: &'a str,
    asset_type: &'a str,
    file_size: String,
    chunk_size: String,
}

#[derive(Serialize)]
struct ReplacementRequest {
    file_size: String,
    chunk_size: String,
}

#[derive(Deserialize)]
struct AssetList {
    #[serde(default)]
    items: Option<Vec<Asset>>,
}

/// The service sends `null` for fields an asset type has no value for.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl Client {
    /// Create a video asset that is ready to receive `file_size` bytes in
    /// chunks of `chunk_size`.
    ///
    /// An empty `name` falls back to `file_name`.
    pub async fn create_asset(
        &self,
        name: &str,
        file_name: &str,
        file_size: u64,
        chunk_size: u64,
    ) -> Result<Asset> {
        let name = if name.is_empty() { file_name } else { name };
        let body = to_json(&CreateAssetRequest {
            name,
            file_name,
            asset_type: "video",
            file_size: file_size.to_string(),
            chunk_size: chunk_size.to_string(),
        })?;

        let resp = self.post("/v2/assets", body).await?;
        check_status(&resp, StatusCode::OK, Error::service)?;
        parse_json(resp.body())
    }

    /// Prepare an existing asset to have its media replaced.
    pub async fn prepare_replacement(
        &self,
        embed_code: &str,
        file_size: u64,
        chunk_size: u64,
    ) -> Result<Asset> {
        let body = to_json(&ReplacementRequest {
            file_size: file_size.to_string(),
            chunk_size: chunk_size.to_string(),
        })?;

        let resp = self
            .post(&format!("/v2/assets/{embed_code}/replacement"), body)
            .await?;
        check_status(&resp, StatusCode::OK, Error::service)?;

        let mut asset: Asset = if resp.body().is_empty() {
            Asset::default()
        } else {
            parse_json(resp.body())?
        };
        if asset.embed_code.is_empty() {
            asset.embed_code = embed_code.to_string();
        }
        Ok(asset)
    }

    /// Fetch one asset.
    pub async fn get_asset(&self, embed_code: &str) -> Result<Asset> {
        let resp = self.get(&format!("/v2/assets/{embed_code}")).await?;
        check_status(&resp, StatusCode::OK, Error::service)?;
        parse_json(resp.body())
    }

    /// List the assets of the account.
    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        let resp = self.get("/v2/assets").await?;
        check_status(&resp, StatusCode::OK, Error::service)?;
        let list: AssetList = parse_json(resp.body())?;
        Ok(list.items.unwrap_or_default())
    }
}

fn to_json(value: &impl Serialize) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| Error::unexpected("failed to encode request body").with_source(e))
}
