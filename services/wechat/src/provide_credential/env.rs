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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use paysign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the merchant credential from environment variables.
///
/// This provider looks for the following environment variables:
/// - `WECHATPAY_MCH_ID`: The merchant id
/// - `WECHATPAY_API_KEY`: The API key
/// - `WECHATPAY_APP_ID`: The app id (optional)
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(WECHATPAY_MCH_ID), envs.get(WECHATPAY_API_KEY)) {
            (Some(mch_id), Some(api_key)) => Ok(Some(Credential {
                app_id: envs.get(WECHATPAY_APP_ID).cloned().unwrap_or_default(),
                mch_id: mch_id.clone(),
                api_key: api_key.clone(),
                sandbox_key: None,
            })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let envs = HashMap::from([
            (WECHATPAY_MCH_ID.to_string(), "1900000109".to_string()),
            (WECHATPAY_API_KEY.to_string(), "api_key".to_string()),
        ]);
        let ctx = Context::new().with_env(StaticEnv { envs });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("credential must be provided");
        assert_eq!(cred.mch_id, "1900000109");
        assert_eq!(cred.api_key, "api_key");
        assert_eq!(cred.app_id, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial() -> anyhow::Result<()> {
        let envs = HashMap::from([(WECHATPAY_MCH_ID.to_string(), "1900000109".to_string())]);
        let ctx = Context::new().with_env(StaticEnv { envs });

        let cred = EnvCredentialProvider::new().provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }
}
