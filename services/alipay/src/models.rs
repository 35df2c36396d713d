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

//! Typed responses of Alipay APIs.

use crate::constants::SUCCESS_CODE;
use serde::Deserialize;

/// Response of `alipay.data.dataservice.bill.downloadurl.query`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataBillDownloadUrlQueryResponse {
    /// Response node.
    #[serde(rename = "alipay_data_dataservice_bill_downloadurl_query_response")]
    pub response: DataBillDownloadUrlQuery,
    /// Signature over the raw response node.
    #[serde(default)]
    pub sign: Option<String>,
}

/// Payload of [`DataBillDownloadUrlQueryResponse`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataBillDownloadUrlQuery {
    pub code: String,
    pub msg: String,
    pub sub_code: Option<String>,
    pub sub_msg: Option<String>,
    /// Short lived URL of the bill archive.
    pub bill_download_url: Option<String>,
}

impl DataBillDownloadUrlQuery {
    /// Check if the business call succeeded.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_failure() -> serde_json::Result<()> {
        let body = r#"{"alipay_data_dataservice_bill_downloadurl_query_response":{"code":"40004","msg":"Business Failed","sub_code":"isp.bill_not_exist","sub_msg":"账单不存在"}}"#;
        let resp: DataBillDownloadUrlQueryResponse = serde_json::from_str(body)?;

        assert!(!resp.response.is_success());
        assert_eq!(resp.response.sub_code.as_deref(), Some("isp.bill_not_exist"));
        assert_eq!(resp.response.bill_download_url, None);
        assert_eq!(resp.sign, None);
        Ok(())
    }
}
