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

use anyhow::Result;
use backlot_v2::{Credential, RequestSigner};

fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let api_key = std::env::var("BACKLOT_API_KEY").unwrap_or_else(|_| "pcode.apikey".into());
    let secret_key = std::env::var("BACKLOT_SECRET_KEY").unwrap_or_else(|_| "secret".into());
    let cred = Credential::new(api_key, secret_key);

    let signed = RequestSigner::new().sign_path(&cred, "GET", "/v2/assets?limit=10", b"", None)?;
    println!("https://api.ooyala.com{signed}");
    Ok(())
}
