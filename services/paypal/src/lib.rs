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

//! PayPal REST support for paysign.
//!
//! Calls carry a bearer token obtained with the OAuth2 client credentials grant,
//! see [`AccessTokenProvider`]. The token is reused until shortly before it
//! expires.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paysign_core::{CallContext, Context, OsEnv, ParameterMap, Result};
//! use paysign_http_send_reqwest::ReqwestHttpSend;
//! use paysign_paypal::{Client, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads PAYPAL_CLIENT_ID, PAYPAL_SECRET and friends.
//!     let config = Config::default().from_env(&ctx)?;
//!     let client = Client::from_config(ctx, config)?;
//!
//!     let order = client
//!         .order_detail(&CallContext::new(), "5O190127TN364715T", ParameterMap::new())
//!         .await?;
//!     println!("{:?}", order.status);
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
