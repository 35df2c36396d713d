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
use super::Credential;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use log::{debug, warn};
use paysign_core::canonical::to_json;
use paysign_core::time::{format_timestamp, now, DateTime};
use paysign_core::utils::nonce;
use paysign_core::{
    Context, Error, Result, SignAlgorithm, SignRequest, SignatureMeta, SignedEnvelope,
    SigningRequest, Verification, VerifyingKey,
};

/// RequestSigner that implements the API v3 `Authorization` header.
///
/// - [Signature generation](https://pay.weixin.qq.com/wiki/doc/apiv3/wechatpay/wechatpay4_0.shtml)
/// - [Signature verification](https://pay.weixin.qq.com/wiki/doc/apiv3/wechatpay/wechatpay4_1.shtml)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the nonce, only use this function for testing.
    #[cfg(test)]
    pub fn with_nonce(mut self, nonce: &str) -> Self {
        self.nonce = Some(nonce.to_string());
        self
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
        if req.body.is_none() && req.method != Method::GET && !req.params.is_empty() {
            req.body = Some(Bytes::from(to_json(&req.params)?));
        }
        let body = match req.body.as_deref() {
            Some(bs) => std::str::from_utf8(bs)
                .map_err(|e| Error::invalid_value("request body is not utf-8").with_source(e))?,
            None => "",
        };

        let algorithm = cred.algorithm()?;
        let timestamp = format_timestamp(self.time.unwrap_or_else(now));
        let nonce = self.nonce.clone().unwrap_or_else(|| nonce(32));
        let canonical = format!(
            "{}\n{}\n{timestamp}\n{nonce}\n{body}\n",
            req.method,
            req.path_and_query()
        );
        debug!("string to sign: {canonical:?}");
        let signature = algorithm.sign(canonical.as_bytes(), &cred.signing_key)?;

        let schema = match algorithm {
            SignAlgorithm::Sm2 => SCHEMA_SM2,
            _ => SCHEMA_RSA,
        };
        let authorization = format!(
            r#"{schema} mchid="{}",nonce_str="{nonce}",timestamp="{timestamp}",serial_no="{}",signature="{signature}""#,
            cred.mch_id, cred.serial_no
        );
        req.header_insert(AUTHORIZATION, &authorization)?;
        req.header_insert(CONTENT_TYPE, "application/json")?;
        req.header_insert(ACCEPT, "application/json")?;

        req.envelope = Some(SignedEnvelope {
            canonical,
            signature,
            meta: SignatureMeta {
                algorithm,
                serial_no: Some(cred.serial_no.clone()),
                nonce: Some(nonce),
                timestamp: Some(timestamp),
            },
        });
        Ok(())
    }

    fn verify_response(
        &self,
        cred: &Self::Credential,
        resp: &http::Response<Bytes>,
    ) -> Option<Verification> {
        if cred.platform_keys.is_empty() {
            warn!("no wechat pay platform key configured, response signature is not checked");
            return None;
        }

        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
        };
        let (timestamp, nonce, signature, serial) = (
            header(WECHATPAY_TIMESTAMP),
            header(WECHATPAY_NONCE),
            header(WECHATPAY_SIGNATURE),
            header(WECHATPAY_SERIAL),
        );
        let body = String::from_utf8_lossy(resp.body());
        let canonical = format!("{timestamp}\n{nonce}\n{body}\n");

        let key = cred.platform_keys.get(serial);
        let algorithm = match key {
            Some(VerifyingKey::Sm2(_)) => SignAlgorithm::Sm2,
            _ => SignAlgorithm::Rsa,
        };
        let valid = match key {
            _ if timestamp.is_empty() || nonce.is_empty() || signature.is_empty() => false,
            Some(key) => algorithm.verify(canonical.as_bytes(), signature, key),
            None => {
                debug!("response signed by unknown platform serial {serial:?}");
                false
            }
        };

        Some(Verification {
            envelope: SignedEnvelope {
                canonical,
                signature: signature.to_string(),
                meta: SignatureMeta {
                    algorithm,
                    serial_no: Some(serial.to_string()),
                    nonce: Some(nonce.to_string()),
                    timestamp: Some(timestamp.to_string()),
                },
            },
            valid,
        })
    }
}
