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
use crate::models::DataBillDownloadUrlQueryResponse;
use crate::{Config, ConfigCredentialProvider, Credential, RequestSigner};
use paysign_core::{
    CallContext, Context, Dispatcher, Endpoint, ParameterMap, Response, Result, SigningRequest,
};
use std::sync::Arc;

/// Endpoint of the Alipay gateway.
pub fn endpoint() -> Endpoint {
    Endpoint::new(PRODUCTION_GATEWAY).with_sandbox(SANDBOX_GATEWAY)
}

/// Client of the Alipay open platform.
///
/// Every API is a form post to the gateway, selected by the `method` parameter.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher<Credential>,
}

impl Client {
    /// Create a client over a prepared dispatcher.
    pub fn new(dispatcher: Dispatcher<Credential>) -> Self {
        Self { dispatcher }
    }

    /// Create a client from config.
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

    /// Call any gateway `method` with `biz` as `biz_content`.
    ///
    /// This is the seam for APIs without a dedicated method.
    pub async fn do_request(
        &self,
        cx: &CallContext,
        method: &str,
        biz: ParameterMap,
    ) -> Result<Response> {
        let req = SigningRequest::post("")
            .with_params(
                ParameterMap::new()
                    .with(METHOD, method)
                    .with(BIZ_CONTENT, biz),
            )
            .require(&[METHOD]);
        self.dispatcher.send(cx, req).await
    }

    /// Query the download URL of a bill.
    ///
    /// `biz` must carry `bill_type` and `bill_date`.
    ///
    /// - [API reference](https://opendocs.alipay.com/apis/api_15/alipay.data.dataservice.bill.downloadurl.query)
    pub async fn data_bill_download_url_query(
        &self,
        cx: &CallContext,
        biz: ParameterMap,
    ) -> Result<DataBillDownloadUrlQueryResponse> {
        biz.require_non_empty(&["bill_type", "bill_date"])?;
        self.do_request(cx, DATA_BILL_DOWNLOAD_URL_QUERY, biz)
            .await?
            .decode_json()
    }
}
