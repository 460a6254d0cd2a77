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

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use backlot_core::ErrorKind;
use backlot_v2::UploadMode;
use http::StatusCode;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncRead, ReadBuf};

use super::content;
use crate::mock::{service, uploader, MockService, Reply};

#[tokio::test]
async fn test_no_targets() {
    let mock = service(&[], |_| Reply::no_content());
    let err = uploader(mock.clone())
        .upload("ec", content(10).as_slice(), UploadMode::New)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoTargets);
    assert!(mock.chunks().is_empty());
    assert_eq!(mock.requests().len(), 1, "only the target list is fetched");
}

#[tokio::test]
async fn test_second_chunk_fails() {
    let data = content(300);
    let mock = service(&[100, 100, 100], |i| match i {
        1 => Reply::status(StatusCode::INTERNAL_SERVER_ERROR, "chunk storage is down"),
        _ => Reply::no_content(),
    });
    let err = uploader(mock.clone())
        .upload("ec", data.as_slice(), UploadMode::New)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ChunkUpload);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.to_string().contains("chunk 1"));
    assert!(err.to_string().contains("chunk storage is down"));
    assert!(!mock.requests().iter().any(|r| r.is_mark_uploaded()));
}

#[tokio::test]
async fn test_first_failure_does_not_wait_for_siblings() {
    let data = content(300);
    let hung = Arc::new(AtomicBool::new(false));
    let flag = hung.clone();
    let mock = service(&[100, 100, 100], move |i| match i {
        0 => Reply::Hang(flag.clone()),
        1 => Reply::status(StatusCode::BAD_GATEWAY, "bad gateway"),
        _ => Reply::Delay(Duration::from_secs(60), StatusCode::NO_CONTENT),
    });

    let err = tokio::time::timeout(
        Duration::from_secs(10),
        uploader(mock.clone()).upload("ec", data.as_slice(), UploadMode::New),
    )
    .await
    .expect("upload must return on the first failure")
    .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert!(!mock.requests().iter().any(|r| r.is_mark_uploaded()));

    // The hung transfer is aborted once the upload gave up.
    tokio::time::timeout(Duration::from_secs(10), async {
        while !hung.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("pending transfer must be dropped");
}

#[tokio::test]
async fn test_short_read() {
    let mock = service(&[100, 100], |_| Reply::no_content());
    let err = uploader(mock.clone())
        .upload("ec", content(150).as_slice(), UploadMode::New)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ShortRead);
    assert!(mock.chunks().is_empty(), "nothing is sent on a short read");
}

#[tokio::test]
async fn test_target_list_failure() {
    let mock = MockService::new(|_| Reply::status(StatusCode::NOT_FOUND, "asset not found"));
    let err = uploader(mock)
        .upload("missing", content(1).as_slice(), UploadMode::New)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_finalization_failure() {
    let targets = crate::mock::targets_json(&[4]);
    let mock = MockService::new(move |req| {
        let path = req.uri().path();
        if req.uri().host() == Some(crate::mock::UPLOAD_HOST) {
            Reply::no_content()
        } else if path.ends_with("/uploading_urls") {
            Reply::ok(&targets)
        } else {
            Reply::status(StatusCode::CONFLICT, "asset is not uploading")
        }
    });

    let err = uploader(mock.clone())
        .upload("ec", content(4).as_slice(), UploadMode::New)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Finalization);
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert!(err.to_string().contains("asset is not uploading"));
    assert_eq!(mock.chunks().len(), 1);
}

/// Reader that reports when it is dropped.
struct TrackedReader {
    data: io::Cursor<Vec<u8>>,
    dropped: Arc<AtomicBool>,
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.data).poll_read(cx, buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_file_is_released_on_every_path() {
    let cases: Vec<(&str, MockService)> = vec![
        ("success", service(&[8], |_| Reply::no_content())),
        ("no targets", service(&[], |_| Reply::no_content())),
        ("short read", service(&[16], |_| Reply::no_content())),
        (
            "chunk failure",
            service(&[8], |_| Reply::status(StatusCode::FORBIDDEN, "expired")),
        ),
    ];

    for (name, mock) in cases {
        let dropped = Arc::new(AtomicBool::new(false));
        let reader = TrackedReader {
            data: io::Cursor::new(content(8)),
            dropped: dropped.clone(),
        };

        let _ = uploader(mock).upload("ec", reader, UploadMode::New).await;
        assert!(dropped.load(Ordering::SeqCst), "Failed on: {name}");
    }
}
