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
use paysign_core::{Context, Environment, Error, Result};
use std::time::Duration;

/// Config carries all the configuration for Alipay.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `app_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_APP_ID`]
    pub app_id: Option<String>,
    /// `private_key_path` points to the app private key, an RSA PEM or a hex
    /// encoded SM2 key. Will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_PRIVATE_KEY_PATH`]
    pub private_key_path: Option<String>,
    /// `alipay_public_key_path` points to the key verifying responses, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_PUBLIC_KEY_PATH`]
    pub alipay_public_key_path: Option<String>,
    /// `environment` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_ENVIRONMENT`]
    /// - default to production
    pub environment: Option<Environment>,
    /// `base_url` replaces the gateway, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_BASE_URL`]
    pub base_url: Option<String>,
    /// `debug` logs request and response bodies, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_DEBUG`]
    pub debug: Option<bool>,
    /// `timeout` of calls without their own deadline, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIPAY_TIMEOUT`] in seconds
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(ALIPAY_APP_ID) {
            self.app_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIPAY_PRIVATE_KEY_PATH) {
            self.private_key_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIPAY_PUBLIC_KEY_PATH) {
            self.alipay_public_key_path.get_or_insert(v);
        }
        if let (None, Some(v)) = (self.environment, ctx.env_var(ALIPAY_ENVIRONMENT)) {
            self.environment = Some(v.parse()?);
        }
        if let Some(v) = ctx.env_var(ALIPAY_BASE_URL) {
            self.base_url.get_or_insert(v);
        }
        if let (None, Some(v)) = (self.debug, ctx.env_var(ALIPAY_DEBUG)) {
            self.debug = Some(parse_bool(ALIPAY_DEBUG, &v)?);
        }
        if let (None, Some(v)) = (self.timeout, ctx.env_var(ALIPAY_TIMEOUT)) {
            let secs = v.parse::<u64>().map_err(|e| {
                Error::config_invalid(format!("{ALIPAY_TIMEOUT} must be seconds")).with_source(e)
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }

        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" | "" => Ok(false),
        _ => Err(Error::config_invalid(format!(
            "{key} must be a boolean, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::StaticEnv;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_from_env() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (ALIPAY_APP_ID.to_string(), "2016091200494382".to_string()),
                (ALIPAY_ENVIRONMENT.to_string(), "sandbox".to_string()),
                (ALIPAY_BASE_URL.to_string(), "http://127.0.0.1:8080/gateway.do".to_string()),
            ]),
        });

        let config = Config::default().from_env(&ctx)?;
        assert_eq!(config.app_id.as_deref(), Some("2016091200494382"));
        assert_eq!(config.environment, Some(Environment::Sandbox));
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:8080/gateway.do"));
        assert_eq!(config.debug, None);
        Ok(())
    }

    #[test]
    fn test_from_env_keeps_explicit_values() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (ALIPAY_ENVIRONMENT.to_string(), "sandbox".to_string()),
                (ALIPAY_DEBUG.to_string(), "on".to_string()),
            ]),
        });

        let config = Config {
            environment: Some(Environment::Production),
            ..Default::default()
        }
        .from_env(&ctx)?;
        assert_eq!(config.environment, Some(Environment::Production));
        assert_eq!(config.debug, Some(true));
        Ok(())
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(ALIPAY_TIMEOUT.to_string(), "soon".to_string())]),
        });

        let err = Config::default().from_env(&ctx).expect_err("must fail");
        assert_eq!(err.kind(), paysign_core::ErrorKind::ConfigInvalid);
    }
}
