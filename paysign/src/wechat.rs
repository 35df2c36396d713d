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

//! WeChat Pay support with convenience APIs.

pub use paysign_wechat::*;

/// Create a legacy protocol client configured from the process environment.
///
/// Reads `WECHATPAY_*` variables with the [default context](crate::default_context)
/// and loads the client certificate when one is configured.
#[cfg(feature = "default-context")]
pub async fn default_client() -> crate::Result<Client> {
    let ctx = crate::default_context();
    let config = Config::default().from_env(&ctx)?;
    Client::from_config(ctx, config).await
}

/// Create an API v3 client configured from the process environment.
#[cfg(feature = "default-context")]
pub fn default_v3_client() -> crate::Result<v3::Client> {
    let ctx = crate::default_context();
    let config = Config::default().from_env(&ctx)?;
    Ok(v3::Client::from_config(ctx, config))
}
