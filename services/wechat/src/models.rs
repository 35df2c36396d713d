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

//! Typed responses of the legacy XML protocol.
//!
//! `return_code` tells whether the call reached the business layer, `result_code`
//! whether the business operation succeeded. Both are independent of the HTTP status.

use crate::constants::SUCCESS;
use serde::Deserialize;

/// Response of `tools/authcodetoopenid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthCodeToOpenIdResponse {
    pub return_code: Option<String>,
    pub return_msg: Option<String>,
    pub appid: Option<String>,
    pub mch_id: Option<String>,
    pub nonce_str: Option<String>,
    pub sign: Option<String>,
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub openid: Option<String>,
    pub sub_appid: Option<String>,
    pub sub_openid: Option<String>,
}

/// Response of `payitil/report`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportResponse {
    pub return_code: Option<String>,
    pub return_msg: Option<String>,
    pub result_code: Option<String>,
}

/// Response of `secapi/pay/reverse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReverseResponse {
    pub return_code: Option<String>,
    pub return_msg: Option<String>,
    pub appid: Option<String>,
    pub mch_id: Option<String>,
    pub nonce_str: Option<String>,
    pub sign: Option<String>,
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub err_code_des: Option<String>,
    /// `Y` if the order must be reversed again.
    pub recall: Option<String>,
}

fn is_success(return_code: &Option<String>, result_code: &Option<String>) -> bool {
    return_code.as_deref() == Some(SUCCESS) && result_code.as_deref() == Some(SUCCESS)
}

impl AuthCodeToOpenIdResponse {
    /// Check if both the call and the business operation succeeded.
    pub fn is_success(&self) -> bool {
        is_success(&self.return_code, &self.result_code)
    }
}

impl ReportResponse {
    /// Check if both the call and the business operation succeeded.
    pub fn is_success(&self) -> bool {
        is_success(&self.return_code, &self.result_code)
    }
}

impl ReverseResponse {
    /// Check if both the call and the business operation succeeded.
    pub fn is_success(&self) -> bool {
        is_success(&self.return_code, &self.result_code)
    }

    /// Check if the caller must reverse the order again.
    pub fn needs_recall(&self) -> bool {
        self.recall.as_deref() == Some("Y")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::Response;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_reverse() {
        let content = r#"<xml>
            <return_code><![CDATA[SUCCESS]]></return_code>
            <return_msg><![CDATA[OK]]></return_msg>
            <appid><![CDATA[wx2421b1c4370ec43b]]></appid>
            <result_code><![CDATA[FAIL]]></result_code>
            <err_code><![CDATA[USERPAYING]]></err_code>
            <recall><![CDATA[Y]]></recall>
        </xml>"#;
        let resp = Response {
            status: http::StatusCode::OK,
            headers: http::HeaderMap::new(),
            body: content.into(),
            verified_envelope: None,
        };
        let resp: ReverseResponse = resp.decode_xml().expect("must decode");

        assert_eq!(resp.appid.as_deref(), Some("wx2421b1c4370ec43b"));
        assert!(!resp.is_success());
        assert!(resp.needs_recall());
        assert_eq!(resp.err_code_des, None);
    }
}
