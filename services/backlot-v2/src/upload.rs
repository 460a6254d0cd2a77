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

use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{Request, StatusCode, Uri};
use log::{debug, warn};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinSet;

use crate::client::{check_status, parse_json};
use crate::constants::TARGET_FILESIZE;
use crate::{Asset, Client, PreviewImage};
use backlot_core::{Context, Error, Result};

const UPLOADED_STATUS: &[u8] = br#"{"status":"uploaded"}"#;

/// Which lifecycle an upload belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadMode {
    /// Media for a freshly created asset.
    #[default]
    New,
    /// New media for an asset prepared with [`Client::prepare_replacement`].
    Replacement,
}

impl UploadMode {
    fn asset_path(self, embed_code: &str, leaf: &str) -> String {
        match self {
            UploadMode::New => format!("/v2/assets/{embed_code}/{leaf}"),
            UploadMode::Replacement => format!("/v2/assets/{embed_code}/replacement/{leaf}"),
        }
    }
}

/// Steps of one [`Uploader::upload`] call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// Asking the service where the chunks go.
    FetchingTargets,
    /// Reading chunks from the file and building their transfers.
    Dispatching,
    /// Transfers are in flight.
    AwaitingCompletion,
    /// Every transfer answered `204 No Content`.
    Completed,
    /// Marking the asset as uploaded.
    MarkingUploaded,
    /// The asset is uploaded and processing has started.
    Done,
    /// The upload stopped on an error.
    Failed,
}

impl Display for UploadPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UploadPhase::FetchingTargets => "fetching targets",
            UploadPhase::Dispatching => "dispatching",
            UploadPhase::AwaitingCompletion => "awaiting completion",
            UploadPhase::Completed => "completed",
            UploadPhase::MarkingUploaded => "marking uploaded",
            UploadPhase::Done => "done",
            UploadPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// UploadTarget is a url handed out by the service for exactly one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    url: String,
    size: usize,
}

impl UploadTarget {
    /// Parse a target url, reading the chunk size from its `filesize` query.
    pub fn parse(url: &str) -> Result<Self> {
        let uri: Uri = url.parse().map_err(|e| {
            Error::service(format!("invalid upload target: {url}")).with_source(e)
        })?;
        let (_, size) = form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
            .find(|(k, _)| k == TARGET_FILESIZE)
            .ok_or_else(|| {
                Error::service(format!("upload target has no {TARGET_FILESIZE}: {url}"))
            })?;
        let size = size.parse::<usize>().map_err(|e| {
            Error::service(format!("invalid {TARGET_FILESIZE} {size:?} in upload target"))
                .with_source(e)
        })?;

        Ok(Self {
            url: url.to_string(),
            size,
        })
    }

    /// Url to `PUT` the chunk to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Exact number of bytes the target expects.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// UploadHook lets callers observe or adjust chunk transfers.
///
/// All methods have no-op defaults.
pub trait UploadHook: Debug + Send + Sync + 'static {
    /// Called once the targets are known and before any chunk is read.
    ///
    /// Returning an error aborts the upload.
    fn on_start(&self, _chunks: usize, _total_bytes: u64) -> Result<()> {
        Ok(())
    }

    /// Rewrite a chunk transfer before it is sent.
    ///
    /// The body must keep its length, `Content-Length` is already set.
    fn filter(&self, req: Request<Bytes>) -> Result<Request<Bytes>> {
        Ok(req)
    }

    /// Called after chunk `index` got its `204 No Content`.
    fn on_chunk_complete(&self, _index: usize, _bytes: usize) {}

    /// Called when [`Uploader::upload`] returns, whatever the outcome.
    fn on_finish(&self) {}
}

/// Uploader drives the chunked upload of asset media.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    hook: Option<Arc<dyn UploadHook>>,
}

impl Uploader {
    /// Create a new uploader.
    pub fn new(client: Client) -> Self {
        Self { client, hook: None }
    }

    /// Set the hook called during uploads.
    pub fn with_hook(mut self, hook: impl UploadHook) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Get the client used by this uploader.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Create a video asset, upload `file` to it and start processing.
    pub async fn create_upload_asset(
        &self,
        file: File,
        file_name: &str,
        name: &str,
        chunk_size: u64,
    ) -> Result<Asset> {
        let file_size = file.metadata().await?.len();
        let asset = self
            .client
            .create_asset(name, file_name, file_size, chunk_size)
            .await?;

        self.upload(&asset.embed_code, file, UploadMode::New)
            .await?;
        Ok(asset)
    }

    /// Replace the media of asset `embed_code` with `file` and start processing.
    pub async fn replace_upload_asset(
        &self,
        file: File,
        chunk_size: u64,
        embed_code: &str,
    ) -> Result<Asset> {
        let file_size = file.metadata().await?.len();
        let asset = self
            .client
            .prepare_replacement(embed_code, file_size, chunk_size)
            .await?;

        self.upload(&asset.embed_code, file, UploadMode::Replacement)
            .await?;
        Ok(asset)
    }

    /// Upload `file` to the targets of asset `embed_code`, then mark the
    /// asset as uploaded.
    ///
    /// Chunks are read in target order from the start of `file` and sent
    /// concurrently. The first failed transfer is returned right away and
    /// the transfers still in flight are aborted; the asset is not marked
    /// in that case.
    ///
    /// `file` is dropped before this returns.
    pub async fn upload<R>(&self, embed_code: &str, file: R, mode: UploadMode) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let result = self.run(embed_code, file, mode).await;
        match &result {
            Ok(()) => debug!("asset {embed_code}: {}", UploadPhase::Done),
            Err(err) => warn!("asset {embed_code}: {}: {err}", UploadPhase::Failed),
        }

        if let Some(hook) = &self.hook {
            hook.on_finish();
        }
        result
    }

    async fn run<R>(&self, embed_code: &str, mut file: R, mode: UploadMode) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        debug!("asset {embed_code}: {}", UploadPhase::FetchingTargets);
        let targets = self.upload_targets(embed_code, mode).await?;
        if targets.is_empty() {
            return Err(Error::no_targets(format!(
                "asset {embed_code} has no upload targets"
            )));
        }
        if let Some(hook) = &self.hook {
            let total = targets.iter().map(|t| t.size() as u64).sum();
            hook.on_start(targets.len(), total)?;
        }

        debug!("asset {embed_code}: {}", UploadPhase::Dispatching);
        let chunks = read_chunks(&mut file, &targets).await?;
        drop(file);
        let requests = targets
            .iter()
            .zip(chunks)
            .enumerate()
            .map(|(index, (target, chunk))| self.chunk_request(index, target, chunk))
            .collect::<Result<Vec<_>>>()?;

        debug!("asset {embed_code}: {}", UploadPhase::AwaitingCompletion);
        self.transfer(requests).await?;
        debug!("asset {embed_code}: {}", UploadPhase::Completed);

        debug!("asset {embed_code}: {}", UploadPhase::MarkingUploaded);
        self.trigger_processing(embed_code, mode).await
    }

    /// Fetch the ordered upload targets of an asset.
    pub async fn upload_targets(
        &self,
        embed_code: &str,
        mode: UploadMode,
    ) -> Result<Vec<UploadTarget>> {
        let resp = self
            .client
            .get(&mode.asset_path(embed_code, "uploading_urls"))
            .await?;
        check_status(&resp, StatusCode::OK, Error::service)?;

        let urls: Vec<String> = parse_json(resp.body())?;
        urls.iter().map(|url| UploadTarget::parse(url)).collect()
    }

    /// Mark the asset as uploaded, which starts its processing.
    pub async fn trigger_processing(&self, embed_code: &str, mode: UploadMode) -> Result<()> {
        let resp = self
            .client
            .put(
                &mode.asset_path(embed_code, "upload_status"),
                Bytes::from_static(UPLOADED_STATUS),
            )
            .await?;
        check_status(&resp, StatusCode::OK, Error::finalization)
    }

    /// Upload a preview image for asset `embed_code` and return it as stored.
    pub async fn upload_image<R>(&self, embed_code: &str, mut file: R) -> Result<PreviewImage>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut body = Vec::new();
        file.read_to_end(&mut body).await?;
        drop(file);

        let path = format!("/v2/assets/{embed_code}/preview_image_files");
        let resp = self.client.post(&path, body).await?;
        check_status(&resp, StatusCode::OK, Error::service)?;

        let resp = self.client.get(&path).await?;
        check_status(&resp, StatusCode::OK, Error::service)?;
        let images: Vec<PreviewImage> = parse_json(resp.body())?;
        images.into_iter().next().ok_or_else(|| {
            Error::service(format!("asset {embed_code} has no preview image after upload"))
        })
    }

    fn chunk_request(
        &self,
        index: usize,
        target: &UploadTarget,
        chunk: Bytes,
    ) -> Result<Request<Bytes>> {
        let len = chunk.len();
        let req = Request::put(target.url())
            .header(CONTENT_LENGTH, len)
            .body(chunk)?;

        let req = match &self.hook {
            Some(hook) => hook.filter(req)?,
            None => req,
        };
        if req.body().len() != len {
            return Err(Error::request_invalid(format!(
                "upload hook resized chunk {index} from {len} to {} bytes",
                req.body().len()
            )));
        }
        Ok(req)
    }

    async fn transfer(&self, requests: Vec<Request<Bytes>>) -> Result<()> {
        let mut tasks = JoinSet::new();
        for (index, req) in requests.into_iter().enumerate() {
            debug!("chunk {index}: sending {} bytes", req.body().len());
            let ctx = self.client.context().clone();
            tasks.spawn(async move { upload_chunk(&ctx, index, req).await });
        }

        // Returning early drops `tasks`, which aborts the transfers left.
        while let Some(joined) = tasks.join_next().await {
            let (index, len) = joined
                .map_err(|e| Error::unexpected("chunk upload task failed").with_source(e))??;
            debug!("chunk {index}: uploaded");
            if let Some(hook) = &self.hook {
                hook.on_chunk_complete(index, len);
            }
        }
        Ok(())
    }
}

/// Read one chunk per target, in order, from a single cursor.
async fn read_chunks<R>(file: &mut R, targets: &[UploadTarget]) -> Result<Vec<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let mut chunks = Vec::with_capacity(targets.len());
    for (index, target) in targets.iter().enumerate() {
        let mut buf = Vec::new();
        let n = (&mut *file)
            .take(target.size() as u64)
            .read_to_end(&mut buf)
            .await?;
        if n < target.size() {
            return Err(Error::short_read(format!(
                "chunk {index} expects {} bytes but only {n} are left",
                target.size()
            )));
        }
        chunks.push(Bytes::from(buf));
    }
    Ok(chunks)
}

async fn upload_chunk(ctx: &Context, index: usize, req: Request<Bytes>) -> Result<(usize, usize)> {
    let len = req.body().len();
    let resp = ctx.http_send(req).await?;

    check_status(&resp, StatusCode::NO_CONTENT, |msg| {
        Error::chunk_upload(format!("chunk {index}: {msg}"))
    })?;
    Ok((index, len))
}
