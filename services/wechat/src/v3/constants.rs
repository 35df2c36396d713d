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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

pub const HOST: &str = "https://api.mch.weixin.qq.com";

pub const SCHEMA_RSA: &str = "WECHATPAY2-SHA256-RSA2048";
pub const SCHEMA_SM2: &str = "WECHATPAY2-SM2-WITH-SM3";

// Response headers
pub const WECHATPAY_TIMESTAMP: &str = "wechatpay-timestamp";
pub const WECHATPAY_NONCE: &str = "wechatpay-nonce";
pub const WECHATPAY_SIGNATURE: &str = "wechatpay-signature";
pub const WECHATPAY_SERIAL: &str = "wechatpay-serial";

// Paths
pub const APPLY4SUB_SUBMIT: &str = "/v3/applyment4sub/applyment/";
pub const APPLY4SUB_QUERY_BY_BUSINESS_CODE: &str = "/v3/applyment4sub/applyment/business_code/";
pub const APPLY4SUB_QUERY_BY_APPLY_ID: &str = "/v3/applyment4sub/applyment/applyment_id/";
pub const APPLY4SUB_SUB_MERCHANTS: &str = "/v3/apply4sub/sub_merchants/";

/// Characters kept verbatim in a path segment.
pub const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
