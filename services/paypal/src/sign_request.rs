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
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use paysign_core::canonical::{to_form, to_json};
use paysign_core::{Context, Result, SignRequest, SigningRequest};

/// RequestSigner that authorizes REST calls with the bearer token.
///
/// PayPal doesn't sign payloads, so no envelope is recorded.
#[derive(Debug, Default)]
pub struct RequestSigner {}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut SigningRequest,
        cred: &Self::Credential,
    ) -> Result<()> {
        if !req.params.is_empty() {
            if req.method == Method::GET {
                if req.query.is_none() {
                    req.query = Some(to_form(&req.params));
                }
            } else if req.body.is_none() {
                req.body = Some(Bytes::from(to_json(&req.params)?));
            }
        }

        req.header_insert(
            AUTHORIZATION,
            &format!("{AUTHORIZATION_PREFIX_BEARER}{}", cred.access_token),
        )?;
        req.header_insert(ACCEPT, "*/*")?;
        req.header_insert(CONTENT_TYPE, "application/json")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::ParameterMap;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_sign_post() -> Result<()> {
        let mut req = SigningRequest::post(CHECKOUT_ORDERS).with_params(
            ParameterMap::new()
                .with("intent", "CAPTURE")
                .with("purchase_units", vec![ParameterMap::new().with("reference_id", "d9f80740")]),
        );
        RequestSigner::new()
            .sign_request(&Context::new(), &mut req, &Credential::new("A21AAF"))
            .await?;

        assert_eq!(req.headers[AUTHORIZATION], "Bearer A21AAF");
        assert_eq!(req.headers[ACCEPT], "*/*");
        assert_eq!(req.headers[CONTENT_TYPE], "application/json");
        assert_eq!(
            req.body.as_deref(),
            Some(br#"{"intent":"CAPTURE","purchase_units":[{"reference_id":"d9f80740"}]}"#.as_slice())
        );
        assert!(req.envelope.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_get_and_preset_body() -> Result<()> {
        let mut req = SigningRequest::get("/v2/checkout/orders/5O190127TN364715T")
            .with_params(ParameterMap::new().with("fields", "payment_source"));
        RequestSigner::new()
            .sign_request(&Context::new(), &mut req, &Credential::new("A21AAF"))
            .await?;
        assert_eq!(req.query.as_deref(), Some("fields=payment_source"));
        assert!(req.body.is_none());

        let mut req = SigningRequest::new(Method::PATCH, "/v2/checkout/orders/5O190127TN364715T")
            .with_params(ParameterMap::new().with("ignored", "x"))
            .with_body(r#"[{"op":"replace","path":"/intent","value":"CAPTURE"}]"#);
        RequestSigner::new()
            .sign_request(&Context::new(), &mut req, &Credential::new("A21AAF"))
            .await?;
        assert_eq!(
            req.body.as_deref(),
            Some(br#"[{"op":"replace","path":"/intent","value":"CAPTURE"}]"#.as_slice())
        );
        Ok(())
    }
}
