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
use paysign_core::{CertificateStore, Context, Environment, Error, Result};
use std::time::Duration;

/// Config carries all the configuration for WeChat Pay.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `app_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_APP_ID`]
    pub app_id: Option<String>,
    /// `mch_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_MCH_ID`]
    pub mch_id: Option<String>,
    /// `api_key` signs the legacy XML protocol, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_API_KEY`]
    pub api_key: Option<String>,
    /// `serial_no` of the merchant certificate used by the JSON protocol, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_SERIAL_NO`]
    pub serial_no: Option<String>,
    /// `private_key_path` points to the merchant private key, either an RSA PEM
    /// or a hex encoded SM2 key. Will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_PRIVATE_KEY_PATH`]
    pub private_key_path: Option<String>,
    /// `platform_serial_no` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_PLATFORM_SERIAL_NO`]
    pub platform_serial_no: Option<String>,
    /// `platform_public_key_path` points to the key verifying responses, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_PLATFORM_PUBLIC_KEY_PATH`]
    pub platform_public_key_path: Option<String>,
    /// `cert_path` points to the client certificate chain in PEM, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_CERT_PATH`]
    pub cert_path: Option<String>,
    /// `cert_key_path` points to the client certificate key in PEM, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_CERT_KEY_PATH`]
    pub cert_key_path: Option<String>,
    /// `root_ca_path` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_ROOT_CA_PATH`]
    pub root_ca_path: Option<String>,
    /// `environment` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_ENVIRONMENT`]
    /// - default to production
    pub environment: Option<Environment>,
    /// `base_url` replaces the host of every call, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_BASE_URL`]
    pub base_url: Option<String>,
    /// `debug` logs request and response bodies, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_DEBUG`]
    pub debug: Option<bool>,
    /// `timeout` of calls without their own deadline, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHATPAY_TIMEOUT`] in seconds
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load config from env.
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](paysign_core::ErrorKind::ConfigInvalid) if
    /// the environment, debug flag or timeout can't be parsed.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(WECHATPAY_APP_ID) {
            self.app_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_MCH_ID) {
            self.mch_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_API_KEY) {
            self.api_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_SERIAL_NO) {
            self.serial_no.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_PRIVATE_KEY_PATH) {
            self.private_key_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_PLATFORM_SERIAL_NO) {
            self.platform_serial_no.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_PLATFORM_PUBLIC_KEY_PATH) {
            self.platform_public_key_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_CERT_PATH) {
            self.cert_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_CERT_KEY_PATH) {
            self.cert_key_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_ROOT_CA_PATH) {
            self.root_ca_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_ENVIRONMENT) {
            if self.environment.is_none() {
                self.environment = Some(v.parse()?);
            }
        }
        if let Some(v) = ctx.env_var(WECHATPAY_BASE_URL) {
            self.base_url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(WECHATPAY_DEBUG) {
            if self.debug.is_none() {
                self.debug = Some(parse_bool(WECHATPAY_DEBUG, &v)?);
            }
        }
        if let Some(v) = ctx.env_var(WECHATPAY_TIMEOUT) {
            if self.timeout.is_none() {
                let secs = v.parse::<u64>().map_err(|e| {
                    Error::config_invalid(format!("{WECHATPAY_TIMEOUT} must be seconds"))
                        .with_source(e)
                })?;
                self.timeout = Some(Duration::from_secs(secs));
            }
        }

        Ok(self)
    }

    /// Load the client certificate if both `cert_path` and `cert_key_path` are set.
    pub async fn load_certificates(&self, ctx: &Context) -> Result<Option<CertificateStore>> {
        let (Some(cert), Some(key)) = (&self.cert_path, &self.cert_key_path) else {
            return Ok(None);
        };

        let store =
            CertificateStore::load_from_files(ctx, cert, key, self.root_ca_path.as_deref()).await?;
        Ok(Some(store))
    }
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool> {
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
    use paysign_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() -> Result<()> {
        let ctx = ctx(&[
            (WECHATPAY_APP_ID, "wx8888888888888888"),
            (WECHATPAY_MCH_ID, "1900000109"),
            (WECHATPAY_API_KEY, "api_key"),
            (WECHATPAY_ENVIRONMENT, "sandbox"),
            (WECHATPAY_DEBUG, "on"),
            (WECHATPAY_TIMEOUT, "5"),
        ]);

        let config = Config {
            mch_id: Some("1230000109".to_string()),
            ..Default::default()
        }
        .from_env(&ctx)?;

        assert_eq!(config.app_id.as_deref(), Some("wx8888888888888888"));
        // Explicit values win over env.
        assert_eq!(config.mch_id.as_deref(), Some("1230000109"));
        assert_eq!(config.api_key.as_deref(), Some("api_key"));
        assert_eq!(config.environment, Some(Environment::Sandbox));
        assert_eq!(config.debug, Some(true));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        Ok(())
    }

    #[test]
    fn test_from_env_invalid() {
        let err = Config::default()
            .from_env(&ctx(&[(WECHATPAY_ENVIRONMENT, "staging")]))
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Config::default()
            .from_env(&ctx(&[(WECHATPAY_DEBUG, "maybe")]))
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_load_certificates_without_paths() -> Result<()> {
        let config = Config {
            cert_path: Some("apiclient_cert.pem".to_string()),
            ..Default::default()
        };
        assert!(config.load_certificates(&Context::new()).await?.is_none());
        Ok(())
    }
}
