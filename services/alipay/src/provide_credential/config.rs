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

use crate::{Config, Credential};
use async_trait::async_trait;
use paysign_core::{Context, ProvideCredential, Result, SigningKey, VerifyingKey};
use std::sync::Arc;

/// ConfigCredentialProvider reads the keys named by config.
///
/// Returns `None` unless both `app_id` and `private_key_path` are set.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new `ConfigCredentialProvider` instance.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let (Some(app_id), Some(key_path)) = (&self.config.app_id, &self.config.private_key_path)
        else {
            return Ok(None);
        };

        let content = ctx.file_read_as_string(key_path).await?;
        let signing_key = if content.contains("-----BEGIN") {
            SigningKey::rsa_from_pem(&content)?
        } else {
            SigningKey::sm2_from_hex(&content)?
        };
        let mut cred = Credential::new(app_id, signing_key);

        if let Some(path) = &self.config.alipay_public_key_path {
            let content = ctx.file_read_as_string(path).await?;
            let key = if content.contains("-----BEGIN") {
                VerifyingKey::rsa_from_pem(&content)?
            } else {
                VerifyingKey::sm2_from_hex(&content)?
            };
            cred = cred.with_alipay_public_key(key);
        }
        Ok(Some(cred))
    }
}
