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

use paysign_core::utils::Redact;
use paysign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential of the legacy XML protocol.
#[derive(Default, Clone)]
pub struct Credential {
    /// App id bound to the merchant.
    pub app_id: String,
    /// Merchant id.
    pub mch_id: String,
    /// API key used for keyed hash signatures.
    pub api_key: String,
    /// Sign key issued by the sandbox, only present in sandbox.
    pub sandbox_key: Option<String>,
}

impl Credential {
    /// Create a new credential.
    pub fn new(app_id: &str, mch_id: &str, api_key: &str) -> Self {
        Self {
            app_id: app_id.to_string(),
            mch_id: mch_id.to_string(),
            api_key: api_key.to_string(),
            sandbox_key: None,
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("app_id", &self.app_id)
            .field("mch_id", &self.mch_id)
            .field("api_key", &Redact::from(&self.api_key))
            .field("sandbox_key", &Redact::from(&self.sandbox_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.mch_id.is_empty() && !self.api_key.is_empty()
    }
}
