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

mod chunks;
mod failures;
mod lifecycle;

use std::io::Write;

use tempfile::NamedTempFile;

/// Deterministic content that differs between neighbouring chunks.
pub fn content(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Write `data` to a temp file and open it for reading.
pub async fn temp_file(data: &[u8]) -> (NamedTempFile, tokio::fs::File) {
    let mut tmp = NamedTempFile::new().expect("temp file must be created");
    tmp.write_all(data).expect("temp file must be written");
    tmp.flush().expect("temp file must be flushed");

    let file = tokio::fs::File::open(tmp.path())
        .await
        .expect("temp file must open");
    (tmp, file)
}
