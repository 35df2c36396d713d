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
use http::header::{ACCEPT, CONTENT_TYPE};
use log::{debug, warn};
use paysign_core::canonical::{sign_string, to_form};
use paysign_core::time::{format_china_datetime, now, DateTime};
use paysign_core::{
    Context, Error, Result, SignAlgorithm, SignRequest, SignatureMeta, SignedEnvelope,
    SigningRequest, Verification,
};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;

/// RequestSigner that implements the Alipay open platform signature.
///
/// Common parameters are filled when absent, the sorted parameters are signed with
/// the app key and everything is posted as a form.
///
/// - [Signature](https://opendocs.alipay.com/common/02kf5q)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
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
        let algorithm = cred.algorithm()?;
        if let Some(requested) = req.algorithm {
            if requested != algorithm {
                return Err(Error::invalid_value(format!(
                    "alipay app key signs {}, not {}",
                    algorithm.as_str(),
                    requested.as_str()
                )));
            }
        }

        let timestamp = format_china_datetime(self.time.unwrap_or_else(now));
        let params = &mut req.params;
        if req.options.auto_inject_identity && params.is_empty_value(APP_ID) {
            params.set(APP_ID, &cred.app_id);
        }
        for (key, value) in [
            (FORMAT, "JSON"),
            (CHARSET, "utf-8"),
            (SIGN_TYPE, algorithm.as_str()),
            (TIMESTAMP, timestamp.as_str()),
            (VERSION, "1.0"),
        ] {
            if params.is_empty_value(key) {
                params.set(key, value);
            }
        }

        let canonical = sign_string(params);
        let signature = if params.is_empty_value(SIGN) {
            let signature = algorithm.sign(canonical.as_bytes(), &cred.signing_key)?;
            params.set(SIGN, signature.clone());
            signature
        } else {
            debug!("keep the sign supplied by caller");
            params.get_string(SIGN)
        };

        let body = to_form(params);
        let timestamp = params.get_string(TIMESTAMP);
        req.body = Some(Bytes::from(body));
        req.header_insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded;charset=utf-8",
        )?;
        req.header_insert(ACCEPT, "application/json")?;

        let mut meta = SignatureMeta::new(algorithm);
        meta.timestamp = Some(timestamp);
        req.envelope = Some(SignedEnvelope {
            canonical,
            signature,
            meta,
        });
        Ok(())
    }

    fn verify_response(
        &self,
        cred: &Self::Credential,
        resp: &http::Response<Bytes>,
    ) -> Option<Verification> {
        let Some(key) = &cred.alipay_public_key else {
            warn!("alipay public key is not configured, response signature is not checked");
            return None;
        };
        let algorithm = cred.algorithm().ok()?;

        let fields: HashMap<String, Box<RawValue>> = match serde_json::from_slice(resp.body()) {
            Ok(fields) => fields,
            Err(err) => {
                debug!("alipay response is not a json object: {err}");
                return Some(mismatch(algorithm));
            }
        };
        let Some(node) = fields
            .iter()
            .find(|(k, _)| k.ends_with(RESPONSE_SUFFIX))
            .map(|(_, v)| v.get())
        else {
            return Some(mismatch(algorithm));
        };

        let sign = fields
            .get(SIGN)
            .and_then(|v| serde_json::from_str::<String>(v.get()).ok());
        let Some(sign) = sign else {
            #[derive(Deserialize)]
            struct Status {
                #[serde(default)]
                code: String,
            }

            // Alipay leaves error responses unsigned.
            let code = serde_json::from_str::<Status>(node)
                .map(|s| s.code)
                .unwrap_or_default();
            return if code == SUCCESS_CODE {
                Some(mismatch(algorithm))
            } else {
                None
            };
        };

        let valid = algorithm.verify(node.as_bytes(), &sign, key);
        Some(Verification {
            envelope: SignedEnvelope {
                canonical: node.to_string(),
                signature: sign,
                meta: SignatureMeta::new(algorithm),
            },
            valid,
        })
    }
}

fn mismatch(algorithm: SignAlgorithm) -> Verification {
    Verification {
        envelope: SignedEnvelope {
            canonical: String::new(),
            signature: String::new(),
            meta: SignatureMeta::new(algorithm),
        },
        valid: false,
    }
}
