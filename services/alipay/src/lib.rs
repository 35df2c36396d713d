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

//! Alipay open platform support for paysign.
//!
//! Every call is a form post to the gateway. Common parameters are filled in, the
//! sorted parameters are signed with the app's RSA2 or SM2 key, and the response
//! node is checked against the Alipay public key.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paysign_alipay::{Client, Config};
//! use paysign_core::{CallContext, Context, OsEnv, ParameterMap, Result};
//! use paysign_file_read_tokio::TokioFileRead;
//! use paysign_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads ALIPAY_APP_ID, ALIPAY_PRIVATE_KEY_PATH and friends.
//!     let config = Config::default().from_env(&ctx)?;
//!     let client = Client::from_config(ctx, config);
//!
//!     let resp = client
//!         .data_bill_download_url_query(
//!             &CallContext::new(),
//!             ParameterMap::new()
//!                 .with("bill_type", "trade")
//!                 .with("bill_date", "2016-04-05"),
//!         )
//!         .await?;
//!     println!("{:?}", resp.response.bill_download_url);
//!     Ok(())
//! }
//! ```

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
