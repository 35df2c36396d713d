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

//! WeChat Pay API v3.
//!
//! Requests carry an `Authorization` header signed with the merchant's RSA or SM2
//! key. Responses are signed by the platform and checked against the platform key
//! matching the `Wechatpay-Serial` header.

mod constants;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{ConfigCredentialProvider, StaticCredentialProvider};

mod sign_request;
pub use sign_request::RequestSigner;

mod client;
pub use client::{endpoint, Client};

pub mod models;
