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

use super::credential::{parse_signing_key, parse_verifying_key};
use super::Credential;
use crate::Config;
use async_trait::async_trait;
use log::debug;
use paysign_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

/// StaticCredentialProvider provides a prepared API v3 credential.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

/// ConfigCredentialProvider reads the merchant and platform keys named by config.
///
/// Returns `None` unless `mch_id`, `serial_no` and `private_key_path` are all set.
/// The platform key is optional.
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
        let (Some(mch_id), Some(serial_no), Some(key_path)) = (
            &self.config.mch_id,
            &self.config.serial_no,
            &self.config.private_key_path,
        ) else {
            return Ok(None);
        };

        let signing_key = parse_signing_key(&ctx.file_read_as_string(key_path).await?)?;
        let mut cred = Credential::new(mch_id, serial_no, signing_key);

        if let (Some(serial), Some(path)) = (
            &self.config.platform_serial_no,
            &self.config.platform_public_key_path,
        ) {
            debug!("loading platform key {serial} from {path}");
            let key = parse_verifying_key(&ctx.file_read_as_string(path).await?)?;
            cred = cred.with_platform_key(serial, key);
        }
        Ok(Some(cred))
    }
}
