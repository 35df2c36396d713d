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

//! Signing and dispatching payment gateway requests without effort.
//!
//! `paysign` bundles the core with every provider, each behind a cargo feature:
//!
//! - `wechat`: WeChat Pay, both the legacy XML protocol and API v3
//! - `alipay`: Alipay open platform
//! - `paypal`: PayPal REST
//! - `default-context`: a [`Context`] reading files with tokio and sending
//!   requests with reqwest
//!
//! ## Example
//!
//! ```no_run
//! use paysign::{CallContext, ParameterMap, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = paysign::wechat::default_client().await?;
//! let bill = client
//!     .download_bill(
//!         &CallContext::new(),
//!         ParameterMap::new()
//!             .with("nonce_str", paysign::utils::nonce(32))
//!             .with("bill_date", "20160405")
//!             .with("bill_type", "ALL"),
//!     )
//!     .await?;
//! println!("{bill}");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use paysign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "alipay")]
pub mod alipay;
#[cfg(feature = "paypal")]
pub mod paypal;
#[cfg(feature = "wechat")]
pub mod wechat;
