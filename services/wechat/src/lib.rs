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

//! WeChat Pay support for paysign.
//!
//! This crate talks to both protocols of WeChat Pay:
//!
//! - the legacy XML protocol, signed with keyed MD5 or HMAC-SHA256 over the sorted
//!   parameters, see [`Client`]
//! - API v3, signed with an RSA or SM2 `Authorization` header, see [`v3::Client`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use paysign_core::{CallContext, Context, OsEnv, ParameterMap, Result};
//! use paysign_file_read_tokio::TokioFileRead;
//! use paysign_http_send_reqwest::ReqwestHttpSend;
//! use paysign_wechat::{Client, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads WECHATPAY_MCH_ID, WECHATPAY_API_KEY and friends.
//!     let config = Config::default().from_env(&ctx)?;
//!     let client = Client::from_config(ctx, config).await?;
//!
//!     let bill = client
//!         .download_bill(
//!             &CallContext::new(),
//!             ParameterMap::new()
//!                 .with("nonce_str", paysign_core::utils::nonce(32))
//!                 .with("bill_date", "20160405")
//!                 .with("bill_type", "ALL"),
//!         )
//!         .await?;
//!     println!("{bill}");
//!     Ok(())
//! }
//! ```
//!
//! ## Sandbox
//!
//! Set `WECHATPAY_ENVIRONMENT=sandbox`. The sandbox only accepts MD5 signatures made
//! with a key it issues, [`SandboxCredentialProvider`] fetches it before the first call.
//! APIs that only exist in production are still sent to production.

mod client;
pub use client::{endpoint, Client};

mod config;
pub use config::Config;

mod constants;

mod credential;
pub use credential::Credential;

pub mod models;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::RequestSigner;

pub mod v3;

#[cfg(test)]
mod testing;
