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

// Env values used in wechat pay services.
pub const WECHATPAY_APP_ID: &str = "WECHATPAY_APP_ID";
pub const WECHATPAY_MCH_ID: &str = "WECHATPAY_MCH_ID";
pub const WECHATPAY_API_KEY: &str = "WECHATPAY_API_KEY";
pub const WECHATPAY_SERIAL_NO: &str = "WECHATPAY_SERIAL_NO";
pub const WECHATPAY_PRIVATE_KEY_PATH: &str = "WECHATPAY_PRIVATE_KEY_PATH";
pub const WECHATPAY_PLATFORM_SERIAL_NO: &str = "WECHATPAY_PLATFORM_SERIAL_NO";
pub const WECHATPAY_PLATFORM_PUBLIC_KEY_PATH: &str = "WECHATPAY_PLATFORM_PUBLIC_KEY_PATH";
pub const WECHATPAY_CERT_PATH: &str = "WECHATPAY_CERT_PATH";
pub const WECHATPAY_CERT_KEY_PATH: &str = "WECHATPAY_CERT_KEY_PATH";
pub const WECHATPAY_ROOT_CA_PATH: &str = "WECHATPAY_ROOT_CA_PATH";
pub const WECHATPAY_ENVIRONMENT: &str = "WECHATPAY_ENVIRONMENT";
pub const WECHATPAY_BASE_URL: &str = "WECHATPAY_BASE_URL";
pub const WECHATPAY_DEBUG: &str = "WECHATPAY_DEBUG";
pub const WECHATPAY_TIMEOUT: &str = "WECHATPAY_TIMEOUT";

// Hosts
pub const PRODUCTION_HOST: &str = "https://api.mch.weixin.qq.com/";
pub const SANDBOX_HOST: &str = "https://api.mch.weixin.qq.com/sandboxnew/";

// Legacy paths, relative to the host.
pub const AUTH_CODE_TO_OPENID: &str = "tools/authcodetoopenid";
pub const DOWNLOAD_BILL: &str = "pay/downloadbill";
pub const DOWNLOAD_FUND_FLOW: &str = "pay/downloadfundflow";
pub const REPORT: &str = "payitil/report";
pub const BATCH_QUERY_COMMENT: &str = "billcommentsp/batchquerycomment";
pub const REVERSE: &str = "secapi/pay/reverse";
pub const GET_SIGN_KEY: &str = "pay/getsignkey";

// Request fields
pub const APPID: &str = "appid";
pub const MCH_ID: &str = "mch_id";
pub const NONCE_STR: &str = "nonce_str";
pub const SIGN: &str = "sign";
pub const SIGN_TYPE: &str = "sign_type";

// Response fields
pub const RETURN_CODE: &str = "return_code";
pub const RESULT_CODE: &str = "result_code";

pub const SUCCESS: &str = "SUCCESS";
