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
use std::fmt::{Debug, Formatter};

/// Credential of an Alipay app.
#[derive(Clone)]
pub struct Credential {
    /// App id.
    pub app_id: String,
    /// App private key, RSA or SM2.
    pub signing_key: SigningKey,
    /// Alipay public key verifying responses.
    pub alipay_public_key: Option<VerifyingKey>,
}

impl Credential {
    /// Create a new credential without the alipay public key.
    pub fn new(app_id: &str, signing_key: SigningKey) -> Self {
        Self {
            app_id: app_id.to_string(),
            signing_key,
            alipay_public_key: None,
        }
    }

    /// Set the alipay public key.
    pub fn with_alipay_public_key(mut self, key: VerifyingKey) -> Self {
        self.alipay_public_key = Some(key);
        self
    }

    /// Algorithm matching the app key, `RSA2` or `SM2`.
    pub fn algorithm(&self) -> Result<SignAlgorithm> {
        match self.signing_key {
            SigningKey::Rsa(_) => Ok(SignAlgorithm::Rsa),
            SigningKey::Sm2(_) => Ok(SignAlgorithm::Sm2),
            SigningKey::Secret(_) => Err(Error::signing("alipay requires an rsa or sm2 app key")),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("app_id", &self.app_id)
            .field("signing_key", &self.signing_key)
            .field("alipay_public_key", &self.alipay_public_key)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.app_id.is_empty()
    }
}
