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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use backlot_core::ErrorKind;
use backlot_v2::{UploadHook, UploadMode};
use bytes::Bytes;
use http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::{content, temp_file};
use crate::mock::{service, targets_json, uploader, MockService, Reply, UPLOAD_HOST};

#[tokio::test]
async fn test_marks_uploaded_once() -> Result<()> {
    for (mode, prefix) in [
        (UploadMode::New, "/v2/assets/ec"),
        (UploadMode::Replacement, "/v2/assets/ec/replacement"),
    ] {
        let mock = service(&[3, 3], |_| Reply::no_content());
        uploader(mock.clone())
            .upload("ec", content(6).as_slice(), mode)
            .await?;

        let reqs = mock.requests();
        assert_eq!(reqs[0].method, Method::GET);
        assert_eq!(reqs[0].uri.path(), format!("{prefix}/uploading_urls"));

        let marks: Vec<_> = reqs.iter().filter(|r| r.is_mark_uploaded()).collect();
        assert_eq!(marks.len(), 1, "Failed on: {mode:?}");
        assert_eq!(marks[0].uri.path(), format!("{prefix}/upload_status"));
        assert_eq!(marks[0].body, Bytes::from_static(br#"{"status":"uploaded"}"#));
        assert!(marks[0].uri.query().unwrap().contains("signature="));

        // Marking comes after every chunk.
        assert!(reqs.last().unwrap().is_mark_uploaded());
    }
    Ok(())
}

const CREATED: &str = r#"{"name": "movie", "original_file_name": "movie.mp4", "embed_code": "ec42", "asset_type": "video"}"#;

fn lifecycle_service() -> MockService {
    let targets = targets_json(&[600, 424]);
    MockService::new(move |req| {
        let path = req.uri().path();
        if req.uri().host() == Some(UPLOAD_HOST) {
            return Reply::no_content();
        }
        match (req.method().as_str(), path) {
            ("POST", "/v2/assets") => Reply::ok(CREATED),
            ("POST", "/v2/assets/ec42/replacement") => Reply::ok(CREATED),
            ("GET", p) if p.ends_with("/uploading_urls") => Reply::ok(&targets),
            ("PUT", p) if p.ends_with("/upload_status") => Reply::ok("{}"),
            _ => Reply::status(StatusCode::NOT_FOUND, "no such route"),
        }
    })
}

#[tokio::test]
async fn test_create_upload_asset() -> Result<()> {
    let data = content(1024);
    let (_tmp, file) = temp_file(&data).await;

    let mock = lifecycle_service();
    let asset = uploader(mock.clone())
        .create_upload_asset(file, "movie.mp4", "movie", 600)
        .await?;
    assert_eq!(asset.embed_code, "ec42");

    let reqs = mock.requests();
    let create: Value = serde_json::from_slice(&reqs[0].body)?;
    assert_eq!(
        create,
        json!({
            "name": "movie",
            "file_name": "movie.mp4",
            "asset_type": "video",
            "file_size": "1024",
            "chunk_size": "600",
        })
    );
    assert_eq!(reqs[1].uri.path(), "/v2/assets/ec42/uploading_urls");
    assert_eq!(mock.chunks().len(), 2);
    assert_eq!(reqs.last().unwrap().uri.path(), "/v2/assets/ec42/upload_status");
    Ok(())
}

#[tokio::test]
async fn test_replace_upload_asset() -> Result<()> {
    let data = content(1024);
    let (_tmp, file) = temp_file(&data).await;

    let mock = lifecycle_service();
    uploader(mock.clone())
        .replace_upload_asset(file, 600, "ec42")
        .await?;

    let paths: Vec<String> = mock
        .requests()
        .iter()
        .filter(|r| !r.is_chunk())
        .map(|r| r.uri.path().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/v2/assets/ec42/replacement",
            "/v2/assets/ec42/replacement/uploading_urls",
            "/v2/assets/ec42/replacement/upload_status",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_create_failure_skips_upload() {
    let data = content(16);
    let (_tmp, file) = temp_file(&data).await;

    let mock = MockService::new(|_| Reply::status(StatusCode::FORBIDDEN, "no permission"));
    let err = uploader(mock.clone())
        .create_upload_asset(file, "movie.mp4", "", 8)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(mock.requests().len(), 1);
}

#[derive(Debug, Default)]
struct Recording {
    started: Mutex<Option<(usize, u64)>>,
    completed: AtomicUsize,
    finished: AtomicUsize,
    filtered: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
struct RecordingHook(Arc<Recording>);

impl UploadHook for RecordingHook {
    fn on_start(&self, chunks: usize, total_bytes: u64) -> backlot_core::Result<()> {
        *self.0.started.lock().unwrap() = Some((chunks, total_bytes));
        Ok(())
    }

    fn filter(&self, mut req: Request<Bytes>) -> backlot_core::Result<Request<Bytes>> {
        self.0.filtered.fetch_add(1, Ordering::SeqCst);
        req.headers_mut()
            .insert("x-upload-trace", "on".parse().expect("header must be valid"));
        Ok(req)
    }

    fn on_chunk_complete(&self, _index: usize, _bytes: usize) {
        self.0.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_finish(&self) {
        self.0.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_hook_sees_every_chunk() -> Result<()> {
    let hook = RecordingHook::default();
    let mock = service(&[5, 5, 2], |_| Reply::no_content());
    uploader(mock.clone())
        .with_hook(hook.clone())
        .upload("ec", content(12).as_slice(), UploadMode::New)
        .await?;

    let rec = &hook.0;
    assert_eq!(*rec.started.lock().unwrap(), Some((3, 12)));
    assert_eq!(rec.filtered.load(Ordering::SeqCst), 3);
    assert_eq!(rec.completed.load(Ordering::SeqCst), 3);
    assert_eq!(rec.finished.load(Ordering::SeqCst), 1);
    assert!(mock
        .chunks()
        .iter()
        .all(|r| r.headers.get("x-upload-trace").is_some()));
    Ok(())
}

#[tokio::test]
async fn test_hook_finishes_on_failure() {
    let hook = RecordingHook::default();
    let mock = service(&[], |_| Reply::no_content());
    let _ = uploader(mock)
        .with_hook(hook.clone())
        .upload("ec", content(1).as_slice(), UploadMode::New)
        .await;

    assert_eq!(*hook.0.started.lock().unwrap(), None);
    assert_eq!(hook.0.finished.load(Ordering::SeqCst), 1);
}

#[derive(Debug, Clone, Default)]
struct RefuseStart(Arc<Recording>);

impl UploadHook for RefuseStart {
    fn on_start(&self, chunks: usize, total_bytes: u64) -> backlot_core::Result<()> {
        *self.0.started.lock().unwrap() = Some((chunks, total_bytes));
        Err(backlot_core::Error::request_invalid("quota exceeded"))
    }

    fn filter(&self, req: Request<Bytes>) -> backlot_core::Result<Request<Bytes>> {
        self.0.filtered.fetch_add(1, Ordering::SeqCst);
        Ok(req)
    }

    fn on_finish(&self) {
        self.0.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_hook_refusing_start_aborts_upload() {
    let hook = RefuseStart::default();
    let mock = service(&[4, 4], |_| Reply::no_content());
    let err = uploader(mock.clone())
        .with_hook(hook.clone())
        .upload("ec", content(8).as_slice(), UploadMode::New)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(*hook.0.started.lock().unwrap(), Some((2, 8)));
    assert_eq!(hook.0.filtered.load(Ordering::SeqCst), 0);
    assert_eq!(hook.0.finished.load(Ordering::SeqCst), 1);
    assert!(mock.chunks().is_empty());
    assert!(!mock.requests().iter().any(|r| r.is_mark_uploaded()));
}
