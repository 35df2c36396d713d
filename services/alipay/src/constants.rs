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

// Env values used in alipay services.
pub const ALIPAY_APP_ID: &str = "ALIPAY_APP_ID";
pub const ALIPAY_PRIVATE_KEY_PATH: &str = "ALIPAY_PRIVATE_KEY_PATH";
pub const ALIPAY_PUBLIC_KEY_PATH: &str = "ALIPAY_PUBLIC_KEY_PATH";
pub const ALIPAY_ENVIRONMENT: &str = "ALIPAY_ENVIRONMENT";
pub const ALIPAY_BASE_URL: &str = "ALIPAY_BASE_URL";
pub const ALIPAY_DEBUG: &str = "ALIPAY_DEBUG";
pub const ALIPAY_TIMEOUT: &str = "ALIPAY_TIMEOUT";

// Gateways
pub const PRODUCTION_GATEWAY: &str = "https://openapi.alipay.com/gateway.do";
pub const SANDBOX_GATEWAY: &str = "https://openapi-sandbox.dl.alipaydev.com/gateway.do";

// Common request fields
pub const APP_ID: &str = "app_id";
pub const METHOD: &str = "method";
pub const FORMAT: &str = "format";
pub const CHARSET: &str = "charset";
pub const SIGN_TYPE: &str = "sign_type";
pub const SIGN: &str = "sign";
pub const TIMESTAMP: &str = "timestamp";
pub const VERSION: &str = "version";
pub const BIZ_CONTENT: &str = "biz_content";

pub const RESPONSE_SUFFIX: &str = "_response";
pub const SUCCESS_CODE: &str = "10000";

// Methods
pub const DATA_BILL_DOWNLOAD_URL_QUERY: &str = "alipay.data.dataservice.bill.downloadurl.query";
