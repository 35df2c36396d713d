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
use log::debug;
use paysign_core::canonical::{from_xml, sign_string, to_xml};
use paysign_core::{
    Context, Environment, Error, Result, SignAlgorithm, SignRequest, SignatureMeta,
    SignedEnvelope, SigningKey, SigningRequest, Verification, VerifyingKey,
};

/// RequestSigner signs the legacy XML protocol with keyed MD5 or HMAC-SHA256.
///
/// - [Signature algorithm](https://pay.weixin.qq.com/wiki/doc/api/jsapi.php?chapter=4_3)
///
/// The algorithm is taken from `SigningRequest::algorithm` first, then from the
/// `sign_type` parameter, and defaults to MD5. Calls routed to the sandbox are
/// always signed with MD5 and the sandbox sign key.
#[derive(Debug, Default)]
pub struct RequestSigner {}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self {}
    }
}

fn algorithm_of(req: &mut SigningRequest) -> Result<SignAlgorithm> {
    let algorithm = match req.algorithm {
        Some(alg) => {
            req.params.set(SIGN_TYPE, alg.as_str());
            alg
        }
        None => match req.params.get_string(SIGN_TYPE).as_str() {
            "" => SignAlgorithm::Md5,
            v => v.parse()?,
        },
    };
    if !algorithm.is_keyed_hash() {
        return Err(Error::invalid_value(format!(
            "sign_type {algorithm} is not supported by wechat pay"
        )));
    }
    Ok(algorithm)
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
        if req.options.auto_inject_identity {
            if req.params.is_empty_value(APPID) && !cred.app_id.is_empty() {
                req.params.set(APPID, &cred.app_id);
            }
            if req.params.is_empty_value(MCH_ID) {
                req.params.set(MCH_ID, &cred.mch_id);
            }
        }

        let (algorithm, key) = if req.environment == Environment::Sandbox {
            let key = cred.sandbox_key.as_deref().ok_or_else(|| {
                Error::credential_invalid("sandbox sign key has not been loaded")
            })?;
            req.params.set(SIGN_TYPE, SignAlgorithm::Md5.as_str());
            (SignAlgorithm::Md5, key)
        } else {
            (algorithm_of(req)?, cred.api_key.as_str())
        };

        let canonical = sign_string(&req.params);
        let signature = match req.params.get_string(SIGN) {
            s if !s.is_empty() => s,
            _ => {
                let s = algorithm.sign(canonical.as_bytes(), &SigningKey::secret(key))?;
                req.params.set(SIGN, s.clone());
                s
            }
        };
        debug!("signed {} with {algorithm}", req.path);

        req.body = Some(Bytes::from(to_xml(&req.params)?));
        req.header_insert(CONTENT_TYPE, "application/xml; charset=utf-8")?;
        req.envelope = Some(SignedEnvelope {
            canonical,
            signature,
            meta: SignatureMeta {
                nonce: req.params.get(NONCE_STR).map(|v| v.to_text()),
                ..SignatureMeta::new(algorithm)
            },
        });
        Ok(())
    }

    fn verify_response(
        &self,
        cred: &Self::Credential,
        resp: &http::Response<Bytes>,
    ) -> Option<Verification> {
        // Bills are returned as plain text and carry no signature.
        let text = std::str::from_utf8(resp.body()).ok()?;
        let params = from_xml(text).ok()?;
        let signature = params.get_string(SIGN);
        if signature.is_empty() {
            // Every successful legacy response is signed, only failures may go without.
            let succeeded = [RETURN_CODE, RESULT_CODE]
                .iter()
                .any(|k| params.get_string(k) == SUCCESS);
            if !succeeded {
                return None;
            }
            debug!("wechat pay answered SUCCESS without a sign");
            return Some(Verification {
                envelope: SignedEnvelope {
                    canonical: sign_string(&params),
                    signature,
                    meta: SignatureMeta::new(SignAlgorithm::Md5),
                },
                valid: false,
            });
        }

        let algorithm = if signature.len() == 32 {
            SignAlgorithm::Md5
        } else {
            SignAlgorithm::HmacSha256
        };
        let canonical = sign_string(&params);
        let valid = std::iter::once(cred.api_key.as_str())
            .chain(cred.sandbox_key.as_deref())
            .filter(|key| !key.is_empty())
            .any(|key| {
                algorithm.verify(
                    canonical.as_bytes(),
                    &signature,
                    &VerifyingKey::Secret(key.to_string()),
                )
            });

        Some(Verification {
            envelope: SignedEnvelope {
                canonical,
                signature,
                meta: SignatureMeta::new(algorithm),
            },
            valid,
        })
    }
}
