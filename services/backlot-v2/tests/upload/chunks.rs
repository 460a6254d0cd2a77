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

use std::time::Duration;

use anyhow::Result;
use backlot_v2::UploadMode;
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use super::{content, temp_file};
use crate::mock::{service, Reply};

const KIB: usize = 1024;

#[tokio::test]
async fn test_three_targets_are_sent_concurrently() -> Result<()> {
    let sizes = [100 * KIB, 100 * KIB, 50 * KIB];
    let data = content(250 * KIB);
    let (_tmp, file) = temp_file(&data).await;

    let mock = service(&sizes, |_| {
        Reply::Delay(Duration::from_millis(100), StatusCode::NO_CONTENT)
    });
    crate::mock::uploader(mock.clone())
        .upload("ec", file, UploadMode::New)
        .await?;

    let mut chunks = mock.chunks();
    assert_eq!(chunks.len(), 3);
    assert_eq!(mock.max_in_flight(), 3, "all chunks must be in flight at once");

    chunks.sort_by_key(|r| r.uri.path().to_string());
    let mut offset = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.method, Method::PUT);
        assert_eq!(chunk.uri.path(), format!("/chunk/{i}"));
        assert_eq!(chunk.body.len(), sizes[i]);
        assert_eq!(chunk.headers[CONTENT_LENGTH], sizes[i].to_string().as_str());
        assert_eq!(chunk.body, Bytes::copy_from_slice(&data[offset..offset + sizes[i]]));
        offset += sizes[i];
    }
    Ok(())
}

#[tokio::test]
async fn test_chunks_reassemble_the_file() -> Result<()> {
    let sizes = [7, 1, 4096, 333, 1];
    let total: usize = sizes.iter().sum();
    let data = content(total);
    let (_tmp, file) = temp_file(&data).await;

    let mock = service(&sizes, |_| Reply::no_content());
    crate::mock::uploader(mock.clone())
        .upload("ec", file, UploadMode::New)
        .await?;

    let mut chunks = mock.chunks();
    chunks.sort_by_key(|r| {
        r.uri
            .path()
            .trim_start_matches("/chunk/")
            .parse::<usize>()
            .unwrap()
    });
    let rebuilt: Vec<u8> = chunks.iter().flat_map(|r| r.body.to_vec()).collect();
    assert_eq!(rebuilt, data);
    Ok(())
}

#[tokio::test]
async fn test_chunks_are_not_signed() -> Result<()> {
    let data = content(10);
    let mock = service(&[10], |_| Reply::no_content());
    crate::mock::uploader(mock.clone())
        .upload("ec", data.as_slice(), UploadMode::New)
        .await?;

    let chunk = &mock.chunks()[0];
    assert_eq!(chunk.uri.query(), Some("filesize=10"));
    Ok(())
}
