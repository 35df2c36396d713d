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
use crate::Credential;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use log::debug;
use paysign_core::canonical::{from_xml, sign_string, to_xml};
use paysign_core::utils::nonce;
use paysign_core::{
    Context, Endpoint, Error, ParameterMap, ProvideCredential, Result, SignAlgorithm, SigningKey,
};
use std::sync::Arc;

/// SandboxCredentialProvider swaps the merchant api key for the sandbox sign key.
///
/// The sandbox only accepts MD5 signatures made with a key it issues itself. The key
/// is requested from `pay/getsignkey` with a request signed by the real api key.
#[derive(Debug)]
pub struct SandboxCredentialProvider {
    inner: Arc<dyn ProvideCredential<Credential = Credential>>,
    base_url: String,
}

impl SandboxCredentialProvider {
    /// Wrap the provider of the real merchant credential.
    pub fn new(inner: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            inner: Arc::new(inner),
            base_url: SANDBOX_HOST.to_string(),
        }
    }

    /// Request the sign key from another host.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    async fn fetch_sign_key(&self, ctx: &Context, cred: &Credential) -> Result<String> {
        let mut params = ParameterMap::new()
            .with(MCH_ID, &cred.mch_id)
            .with(NONCE_STR, nonce(32));
        let sign = SignAlgorithm::Md5.sign(
            sign_string(&params).as_bytes(),
            &SigningKey::secret(&cred.api_key),
        )?;
        params.set(SIGN, sign);

        let req = http::Request::builder()
            .method(Method::POST)
            .uri(Endpoint::join(&self.base_url, GET_SIGN_KEY))
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(Bytes::from(to_xml(&params)?))?;

        debug!("requesting sandbox sign key for merchant {}", cred.mch_id);
        let resp = ctx.http_send(req).await?;
        if resp.status() != StatusCode::OK {
            return Err(Error::transport(resp.status(), resp.into_body()));
        }

        let text = String::from_utf8_lossy(resp.body());
        let content = from_xml(&text).map_err(|e| {
            Error::unmarshal(
                format!("failed to decode sandbox sign key response: {}", e.message()),
                resp.body().clone(),
            )
        })?;
        if content.get_string(RETURN_CODE) != SUCCESS {
            return Err(Error::credential_invalid(format!(
                "sandbox refused to issue a sign key: {}",
                content.get_string("return_msg")
            )));
        }
        let key = content.get_string("sandbox_signkey");
        if key.is_empty() {
            return Err(Error::credential_invalid(
                "sandbox sign key response has no sandbox_signkey",
            ));
        }
        Ok(key)
    }
}

#[async_trait]
impl ProvideCredential for SandboxCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(mut cred) = self.inner.provide_credential(ctx).await? else {
            return Ok(None);
        };

        cred.sandbox_key = Some(self.fetch_sign_key(ctx, &cred).await?);
        Ok(Some(cred))
    }
}
