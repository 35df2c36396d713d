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

use paysign_core::{Error, Result, SignAlgorithm, SigningCredential, SigningKey, VerifyingKey};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Credential of the API v3 protocol.
#[derive(Clone)]
pub struct Credential {
    /// Merchant id.
    pub mch_id: String,
    /// Serial number of the merchant certificate.
    pub serial_no: String,
    /// Merchant private key, RSA or SM2.
    pub signing_key: SigningKey,
    /// Platform keys verifying responses, keyed by certificate serial number.
    pub platform_keys: HashMap<String, VerifyingKey>,
}

impl Credential {
    /// Create a new credential without platform keys.
    pub fn new(mch_id: &str, serial_no: &str, signing_key: SigningKey) -> Self {
        Self {
            mch_id: mch_id.to_string(),
            serial_no: serial_no.to_string(),
            signing_key,
            platform_keys: HashMap::new(),
        }
    }

    /// Add a platform key.
    pub fn with_platform_key(mut self, serial_no: &str, key: VerifyingKey) -> Self {
        self.platform_keys.insert(serial_no.to_string(), key);
        self
    }

    /// Algorithm matching the merchant key.
    pub fn algorithm(&self) -> Result<SignAlgorithm> {
        match self.signing_key {
            SigningKey::Rsa(_) => Ok(SignAlgorithm::Rsa),
            SigningKey::Sm2(_) => Ok(SignAlgorithm::Sm2),
            SigningKey::Secret(_) => Err(Error::signing(
                "api v3 requires an rsa or sm2 merchant key",
            )),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("mch_id", &self.mch_id)
            .field("serial_no", &self.serial_no)
            .field("signing_key", &self.signing_key)
            .field("platform_keys", &self.platform_keys.keys())
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.mch_id.is_empty() && !self.serial_no.is_empty()
    }
}

/// Load a merchant key, RSA keys are PEM and SM2 keys are hex.
pub(crate) fn parse_signing_key(content: &str) -> Result<SigningKey> {
    if content.contains("-----BEGIN") {
        SigningKey::rsa_from_pem(content)
    } else {
        SigningKey::sm2_from_hex(content)
    }
}

/// Load a platform key, RSA keys are PEM and SM2 keys are hex.
pub(crate) fn parse_verifying_key(content: &str) -> Result<VerifyingKey> {
    if content.contains("-----BEGIN") {
        VerifyingKey::rsa_from_pem(content)
    } else {
        VerifyingKey::sm2_from_hex(content)
    }
}
