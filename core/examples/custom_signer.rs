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

//! Plug a custom gateway into the dispatcher.
//!
//! The gateway here signs the sorted parameters with keyed HMAC-SHA256 and posts
//! them as JSON. An in-process `HttpSend` echoes the request so the example runs
//! offline.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use paysign_core::canonical::{sign_string, to_json};
use paysign_core::{
    CallContext, Context, Dispatcher, Endpoint, Environment, HttpSend, ParameterMap,
    ProvideCredential, Result, SignAlgorithm, SignRequest, SignatureMeta, SignedEnvelope,
    SigningCredential, SigningKey, SigningRequest, StaticEnv,
};
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct MerchantCredential {
    merchant_id: String,
    secret: String,
}

impl SigningCredential for MerchantCredential {
    fn is_valid(&self) -> bool {
        !self.merchant_id.is_empty() && !self.secret.is_empty()
    }
}

#[derive(Debug)]
struct EnvCredentialProvider;

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = MerchantCredential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let (Some(merchant_id), Some(secret)) =
            (ctx.env_var("MY_MERCHANT_ID"), ctx.env_var("MY_SECRET"))
        else {
            return Ok(None);
        };
        Ok(Some(MerchantCredential {
            merchant_id,
            secret,
        }))
    }
}

#[derive(Debug)]
struct HmacJsonSigner;

#[async_trait]
impl SignRequest for HmacJsonSigner {
    type Credential = MerchantCredential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut SigningRequest,
        cred: &Self::Credential,
    ) -> Result<()> {
        if req.options.auto_inject_identity && req.params.is_empty_value("merchant_id") {
            req.params.set("merchant_id", &cred.merchant_id);
        }

        let canonical = sign_string(&req.params);
        let signature = SignAlgorithm::HmacSha256
            .sign(canonical.as_bytes(), &SigningKey::secret(&cred.secret))?;
        req.params.set("sign", signature.clone());

        req.body = Some(Bytes::from(to_json(&req.params)?));
        req.header_insert(CONTENT_TYPE, "application/json")?;
        req.envelope = Some(SignedEnvelope {
            canonical,
            signature,
            meta: SignatureMeta::new(SignAlgorithm::HmacSha256),
        });
        Ok(())
    }
}

#[derive(Debug)]
struct EchoHttpSend;

#[async_trait]
impl HttpSend for EchoHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        println!("{} {}", req.method(), req.uri());
        Ok(http::Response::new(req.into_body()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let ctx = Context::new()
        .with_http_send(EchoHttpSend)
        .with_env(StaticEnv {
            envs: HashMap::from([
                ("MY_MERCHANT_ID".to_string(), "10000100".to_string()),
                ("MY_SECRET".to_string(), "demo-secret".to_string()),
            ]),
        });
    let endpoint =
        Endpoint::new("https://api.example.com/").with_sandbox("https://sandbox.example.com/");
    let dispatcher = Dispatcher::new(ctx, EnvCredentialProvider, HmacJsonSigner, endpoint)
        .with_environment(Environment::Sandbox)
        .with_debug(true);

    let req = SigningRequest::post("v1/refunds")
        .with_params(
            ParameterMap::new()
                .with("out_trade_no", "1217752501201407033233368018")
                .with("amount", 100),
        )
        .require(&["out_trade_no", "amount"]);
    let resp = dispatcher.send(&CallContext::new(), req).await?;

    println!("{}", resp.text()?);
    Ok(())
}
