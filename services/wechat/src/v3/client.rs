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

use super::constants::*;
use super::models::{Apply4SubQuery, Apply4SubQuerySettlement, Apply4SubSubmit};
use super::{ConfigCredentialProvider, Credential, RequestSigner};
use crate::Config;
use http::{Method, StatusCode};
use paysign_core::{
    CallContext, Context, Dispatcher, Endpoint, Error, ParameterMap, Result, SigningRequest,
};
use percent_encoding::utf8_percent_encode;
use std::sync::Arc;

/// Endpoint of API v3, which has no sandbox.
pub fn endpoint() -> Endpoint {
    Endpoint::new(HOST)
}

/// Client of API v3.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher<Credential>,
}

fn segment(v: &str) -> String {
    utf8_percent_encode(v, PATH_SEGMENT_SET).to_string()
}

impl Client {
    /// Create a client over a prepared dispatcher.
    pub fn new(dispatcher: Dispatcher<Credential>) -> Self {
        Self { dispatcher }
    }

    /// Create a client from config.
    ///
    /// Asking for the sandbox yields [`ErrorKind::ConfigInvalid`](paysign_core::ErrorKind::ConfigInvalid)
    /// on every call unless `base_url` is set.
    pub fn from_config(ctx: Context, config: Config) -> Self {
        let mut endpoint = endpoint();
        if let Some(base_url) = &config.base_url {
            endpoint = endpoint.with_base_url_override(base_url);
        }
        let environment = config.environment.unwrap_or_default();
        let debug = config.debug.unwrap_or_default();
        let timeout = config.timeout;

        let mut dispatcher = Dispatcher::new(
            ctx,
            ConfigCredentialProvider::new(Arc::new(config)),
            RequestSigner::new(),
            endpoint,
        )
        .with_environment(environment)
        .with_debug(debug);
        if let Some(timeout) = timeout {
            dispatcher = dispatcher.with_timeout(timeout);
        }
        Self::new(dispatcher)
    }

    /// Get the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<Credential> {
        &self.dispatcher
    }

    /// Submit a sub merchant application.
    ///
    /// Sensitive fields must already be encrypted with the platform certificate.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/apiv3_partner/apis/chapter11_1_1.shtml)
    pub async fn apply4sub_submit(
        &self,
        cx: &CallContext,
        params: ParameterMap,
    ) -> Result<Apply4SubSubmit> {
        let required = [
            "business_code",
            "contact_info",
            "subject_info",
            "business_info",
            "settlement_info",
            "bank_account_info",
        ];
        params.require_non_empty(&required)?;
        let req = SigningRequest::post(APPLY4SUB_SUBMIT)
            .with_params(params)
            .require(&required);
        self.dispatcher.send(cx, req).await?.decode_json()
    }

    /// Query an application by the business code chosen by the merchant.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/apiv3_partner/apis/chapter11_1_2.shtml)
    pub async fn apply4sub_query_by_business_code(
        &self,
        cx: &CallContext,
        business_code: &str,
    ) -> Result<Apply4SubQuery> {
        if business_code.is_empty() {
            return Err(Error::missing_field("business_code"));
        }
        let path = format!("{APPLY4SUB_QUERY_BY_BUSINESS_CODE}{}", segment(business_code));
        let req = SigningRequest::get(path);
        self.dispatcher.send(cx, req).await?.decode_json()
    }

    /// Query an application by the id assigned on submission.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/apiv3_partner/apis/chapter11_1_2.shtml)
    pub async fn apply4sub_query_by_apply_id(
        &self,
        cx: &CallContext,
        applyment_id: i64,
    ) -> Result<Apply4SubQuery> {
        let path = format!("{APPLY4SUB_QUERY_BY_APPLY_ID}{applyment_id}");
        let req = SigningRequest::get(path);
        self.dispatcher.send(cx, req).await?.decode_json()
    }

    /// Change the settlement account of a sub merchant.
    ///
    /// `sub_mchid` is moved from the body into the path. Success is a `204 No Content`.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/apiv3_partner/apis/chapter11_1_3.shtml)
    pub async fn apply4sub_modify_settlement(
        &self,
        cx: &CallContext,
        mut params: ParameterMap,
    ) -> Result<()> {
        params.require_non_empty(&["sub_mchid", "account_type", "account_bank", "account_number"])?;
        let sub_mchid = params
            .remove("sub_mchid")
            .map(|v| v.to_text())
            .unwrap_or_default();

        let path = format!(
            "{APPLY4SUB_SUB_MERCHANTS}{}/modify-settlement",
            segment(&sub_mchid)
        );
        let req = SigningRequest::new(Method::POST, path)
            .with_params(params)
            .require(&["account_type", "account_bank", "account_number"]);
        let resp = self.dispatcher.send(cx, req).await?;
        if resp.status != StatusCode::NO_CONTENT {
            return Err(Error::unexpected(format!(
                "modify settlement expects 204 No Content, got {}",
                resp.status
            ))
            .with_status(resp.status)
            .with_body(resp.body));
        }
        Ok(())
    }

    /// Query the settlement account of a sub merchant.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/apiv3_partner/apis/chapter11_1_4.shtml)
    pub async fn apply4sub_query_settlement(
        &self,
        cx: &CallContext,
        sub_mchid: &str,
    ) -> Result<Apply4SubQuerySettlement> {
        if sub_mchid.is_empty() {
            return Err(Error::missing_field("sub_mchid"));
        }
        let path = format!("{APPLY4SUB_SUB_MERCHANTS}{}/settlement", segment(sub_mchid));
        let req = SigningRequest::get(path);
        self.dispatcher.send(cx, req).await?.decode_json()
    }
}
