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

/// Config carries all the configuration for PayPal.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PAYPAL_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PAYPAL_SECRET`]
    pub secret: Option<String>,
    /// `environment` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PAYPAL_ENVIRONMENT`]
    /// - default to production
    pub environment: Option<Environment>,
    /// `base_url` replaces the REST host, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PAYPAL_BASE_URL`]
    pub base_url: Option<String>,
    /// `debug` logs request and response bodies, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PAYPAL_DEBUG`]
    pub debug: Option<bool>,
    /// `timeout` of calls without their own deadline, will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PAYPAL_TIMEOUT`] in seconds
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(PAYPAL_CLIENT_ID) {
            self.client_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(PAYPAL_SECRET) {
            self.secret.get_or_insert(v);
        }
        if let (None, Some(v)) = (self.environment, ctx.env_var(PAYPAL_ENVIRONMENT)) {
            self.environment = Some(v.parse()?);
        }
        if let Some(v) = ctx.env_var(PAYPAL_BASE_URL) {
            self.base_url.get_or_insert(v);
        }
        if let (None, Some(v)) = (self.debug, ctx.env_var(PAYPAL_DEBUG)) {
            self.debug = Some(match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" | "" => false,
                _ => {
                    return Err(Error::config_invalid(format!(
                        "{PAYPAL_DEBUG} must be a boolean, got {v}"
                    )))
                }
            });
        }
        if let (None, Some(v)) = (self.timeout, ctx.env_var(PAYPAL_TIMEOUT)) {
            let secs = v.parse::<u64>().map_err(|e| {
                Error::config_invalid(format!("{PAYPAL_TIMEOUT} must be seconds")).with_source(e)
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_from_env() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (PAYPAL_CLIENT_ID.to_string(), "client".to_string()),
                (PAYPAL_SECRET.to_string(), "secret".to_string()),
                (PAYPAL_ENVIRONMENT.to_string(), "sandbox".to_string()),
                (PAYPAL_TIMEOUT.to_string(), "10".to_string()),
            ]),
        });

        let config = Config {
            client_id: Some("explicit".to_string()),
            ..Default::default()
        }
        .from_env(&ctx)?;
        assert_eq!(config.client_id.as_deref(), Some("explicit"));
        assert_eq!(config.secret.as_deref(), Some("secret"));
        assert_eq!(config.environment, Some(Environment::Sandbox));
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        Ok(())
    }

    #[test]
    fn test_from_env_rejects_bad_debug() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(PAYPAL_DEBUG.to_string(), "maybe".to_string())]),
        });

        let err = Config::default().from_env(&ctx).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
