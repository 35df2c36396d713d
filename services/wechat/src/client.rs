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

use crate::constants::*;
use crate::models::{AuthCodeToOpenIdResponse, ReportResponse, ReverseResponse};
use crate::{Config, Credential, DefaultCredentialProvider, RequestSigner, SandboxCredentialProvider};
use paysign_core::{
    CallContext, Context, Dispatcher, Endpoint, Environment, Error, ParameterMap, Response,
    Result, Route, SignAlgorithm, SigningRequest,
};
use std::sync::Arc;

const BILL_TYPES: &[&str] = &["ALL", "SUCCESS", "REFUND", "RECHARGE_REFUND"];
const ACCOUNT_TYPES: &[&str] = &["Basic", "Operation", "Fees"];

/// Client of the legacy XML protocol.
///
/// Every operation checks its required parameters before anything is signed or
/// sent, then validates enumerated values.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher<Credential>,
}

/// Endpoint of the legacy XML protocol.
pub fn endpoint() -> Endpoint {
    Endpoint::new(PRODUCTION_HOST).with_sandbox(SANDBOX_HOST)
}

impl Client {
    /// Create a client over a prepared dispatcher.
    pub fn new(dispatcher: Dispatcher<Credential>) -> Self {
        Self { dispatcher }
    }

    /// Create a client from config.
    ///
    /// In sandbox the merchant credential is wrapped by [`SandboxCredentialProvider`]
    /// so calls are signed with the sandbox sign key. The client certificate is loaded
    /// when the config points to one.
    pub async fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let environment = config.environment.unwrap_or_default();
        let mut endpoint = endpoint();
        if let Some(base_url) = &config.base_url {
            endpoint = endpoint.with_base_url_override(base_url);
        }
        let certificates = config.load_certificates(&ctx).await?;
        let debug = config.debug.unwrap_or_default();
        let timeout = config.timeout;
        let sandbox_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| SANDBOX_HOST.to_string());

        let loader = DefaultCredentialProvider::new(Arc::new(config));
        let dispatcher = match environment {
            Environment::Sandbox => Dispatcher::new(
                ctx,
                SandboxCredentialProvider::new(loader).with_base_url(&sandbox_url),
                RequestSigner::new(),
                endpoint,
            ),
            Environment::Production => {
                Dispatcher::new(ctx, loader, RequestSigner::new(), endpoint)
            }
        };

        let mut dispatcher = dispatcher.with_environment(environment).with_debug(debug);
        if let Some(timeout) = timeout {
            dispatcher = dispatcher.with_timeout(timeout);
        }
        if let Some(certificates) = certificates {
            dispatcher = dispatcher.with_certificates(certificates);
        }
        Ok(Self::new(dispatcher))
    }

    /// Get the dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<Credential> {
        &self.dispatcher
    }

    fn is_production(&self) -> bool {
        self.dispatcher.environment() == Environment::Production
    }

    /// Only production calls present the client certificate.
    fn with_cert_in_production(&self, req: SigningRequest) -> SigningRequest {
        if self.is_production() {
            req.with_cert()
        } else {
            req
        }
    }

    /// Send `params` to any path of the production host.
    ///
    /// This is the seam for APIs without a dedicated method. `path` is relative to
    /// the host, for example `pay/micropay`.
    pub async fn post_self(
        &self,
        cx: &CallContext,
        path: &str,
        params: ParameterMap,
        cert: bool,
    ) -> Result<Response> {
        let mut req = SigningRequest::post(path)
            .with_params(params)
            .with_route(Route::Production);
        if cert {
            req = self.with_cert_in_production(req);
        }
        self.dispatcher.send(cx, req).await
    }

    /// Query the openid of the user behind a payment auth code.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/api/micropay.php?chapter=9_13)
    pub async fn auth_code_to_openid(
        &self,
        cx: &CallContext,
        params: ParameterMap,
    ) -> Result<AuthCodeToOpenIdResponse> {
        let req = request(AUTH_CODE_TO_OPENID, params, &[NONCE_STR, "auth_code"])?
            .with_route(Route::Production);
        self.dispatcher.send(cx, req).await?.decode_xml()
    }

    /// Download the trade bill of a day.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/api/jsapi.php?chapter=9_6)
    pub async fn download_bill(&self, cx: &CallContext, params: ParameterMap) -> Result<String> {
        let req = request(DOWNLOAD_BILL, params, &[NONCE_STR, "bill_date", "bill_type"])?;
        check_one_of(&req.params, "bill_type", BILL_TYPES)?;

        let resp = self.dispatcher.send(cx, req).await?;
        Ok(resp.text()?.to_string())
    }

    /// Download the fund flow of a day.
    ///
    /// Production only: the endpoint accepts HMAC-SHA256 signatures exclusively
    /// while the sandbox accepts MD5 only.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/api/jsapi.php?chapter=9_18)
    pub async fn download_fund_flow(
        &self,
        cx: &CallContext,
        params: ParameterMap,
    ) -> Result<String> {
        let req = request(
            DOWNLOAD_FUND_FLOW,
            params,
            &[NONCE_STR, "bill_date", "account_type"],
        )?;
        check_one_of(&req.params, "account_type", ACCOUNT_TYPES)?;
        let req = self.with_cert_in_production(
            req.with_algorithm(SignAlgorithm::HmacSha256)
                .with_route(Route::Production),
        );

        let resp = self.dispatcher.send(cx, req).await?;
        Ok(resp.text()?.to_string())
    }

    /// Report call statistics for transaction assurance.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/api/jsapi.php?chapter=9_8)
    pub async fn report(&self, cx: &CallContext, params: ParameterMap) -> Result<ReportResponse> {
        let req = request(
            REPORT,
            params,
            &[
                NONCE_STR,
                "interface_url",
                "execute_time",
                "return_code",
                "return_msg",
                "result_code",
                "user_ip",
            ],
        )?;
        self.dispatcher.send(cx, req).await?.decode_xml()
    }

    /// Pull the comments users left on orders.
    ///
    /// Production only, signed with HMAC-SHA256.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/api/jsapi.php?chapter=9_17)
    pub async fn batch_query_comment(
        &self,
        cx: &CallContext,
        params: ParameterMap,
    ) -> Result<String> {
        let req = request(
            BATCH_QUERY_COMMENT,
            params,
            &[NONCE_STR, "begin_time", "end_time", "offset"],
        )?;
        let req = self.with_cert_in_production(
            req.with_algorithm(SignAlgorithm::HmacSha256)
                .with_route(Route::Production),
        );

        let resp = self.dispatcher.send(cx, req).await?;
        Ok(resp.text()?.to_string())
    }

    /// Reverse a payment code order.
    ///
    /// - [API reference](https://pay.weixin.qq.com/wiki/doc/api/micropay.php?chapter=9_11)
    pub async fn reverse(&self, cx: &CallContext, params: ParameterMap) -> Result<ReverseResponse> {
        let req = request(REVERSE, params, &[NONCE_STR, "out_trade_no"])?;
        let req = self.with_cert_in_production(req);
        self.dispatcher.send(cx, req).await?.decode_xml()
    }
}

fn request(path: &str, params: ParameterMap, required: &[&str]) -> Result<SigningRequest> {
    params.require_non_empty(required)?;
    Ok(SigningRequest::post(path).with_params(params).require(required))
}

fn check_one_of(params: &ParameterMap, key: &str, allowed: &[&str]) -> Result<()> {
    let value = params.get_string(key);
    if allowed.contains(&value.as_str()) {
        return Ok(());
    }
    Err(Error::invalid_value(format!(
        "{key} must be one of {}, got {value:?}",
        allowed.join(", ")
    )))
}
