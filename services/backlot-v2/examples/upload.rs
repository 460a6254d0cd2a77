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

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use backlot_core::{Context, OsEnv};
use backlot_http_send_reqwest::ReqwestHttpSend;
use backlot_v2::{Client, Config, UploadHook, Uploader};

#[derive(Debug, Default)]
struct Progress {
    total: AtomicUsize,
    done: AtomicUsize,
}

impl UploadHook for Progress {
    fn on_start(&self, chunks: usize, total_bytes: u64) -> backlot_core::Result<()> {
        self.total.store(chunks, Ordering::SeqCst);
        println!("uploading {total_bytes} bytes in {chunks} chunks");
        Ok(())
    }

    fn on_chunk_complete(&self, index: usize, bytes: usize) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.total.load(Ordering::SeqCst);
        println!("[{done}/{total}] chunk {index} ({bytes} bytes)");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let path = env::args().nth(1).expect("usage: upload <file> [name]");
    let name = env::args().nth(2).unwrap_or_default();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx)?;
    let uploader = Uploader::new(Client::from_config(ctx, &config)?).with_hook(Progress::default());

    let file = tokio::fs::File::open(&path).await?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let asset = uploader
        .create_upload_asset(file, &file_name, &name, 100 * 1024 * 1024)
        .await?;
    println!("uploaded as {}", asset.embed_code);
    Ok(())
}
