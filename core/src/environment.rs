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

use crate::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Environment a client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Test environment, no real money moves.
    Sandbox,
    /// Live environment.
    #[default]
    Production,
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Sandbox => f.write_str("sandbox"),
            Environment::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(Error::config_invalid(format!("unknown environment: {s}"))),
        }
    }
}

/// Route selects which base URL a single call goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// Follow the client's environment.
    #[default]
    Client,
    /// Always hit production, used by endpoints that have no sandbox.
    Production,
}

/// Endpoint holds the base URLs of one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    production: String,
    sandbox: Option<String>,
    base_url_override: Option<String>,
}

impl Endpoint {
    /// Create an endpoint that only exists in production.
    pub fn new(production: impl Into<String>) -> Self {
        Self {
            production: production.into(),
            sandbox: None,
            base_url_override: None,
        }
    }

    /// Set the sandbox base URL.
    pub fn with_sandbox(mut self, sandbox: impl Into<String>) -> Self {
        self.sandbox = Some(sandbox.into());
        self
    }

    /// Replace every base URL by `base_url`, for proxies and mock servers.
    pub fn with_base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Resolve the base URL for `route` under `environment`.
    pub fn resolve(&self, environment: Environment, route: Route) -> Result<&str> {
        if let Some(url) = &self.base_url_override {
            return Ok(url);
        }

        match (route, environment) {
            (Route::Production, _) | (Route::Client, Environment::Production) => {
                Ok(&self.production)
            }
            (Route::Client, Environment::Sandbox) => self.sandbox.as_deref().ok_or_else(|| {
                Error::config_invalid(format!(
                    "{} has no sandbox environment",
                    self.production
                ))
            }),
        }
    }

    /// Join `base` and `path` with exactly one slash between them.
    pub fn join(base: &str, path: &str) -> String {
        match (base.ends_with('/'), path.starts_with('/')) {
            (true, true) => format!("{base}{}", &path[1..]),
            (false, false) if !path.is_empty() => format!("{base}/{path}"),
            _ => format!("{base}{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn endpoint() -> Endpoint {
        Endpoint::new("https://api.example.com/").with_sandbox("https://api.example.com/sandboxnew/")
    }

    #[test_case(Environment::Production, Route::Client, "https://api.example.com/"; "production client")]
    #[test_case(Environment::Sandbox, Route::Client, "https://api.example.com/sandboxnew/"; "sandbox client")]
    #[test_case(Environment::Sandbox, Route::Production, "https://api.example.com/"; "sandbox forced production")]
    fn test_resolve(env: Environment, route: Route, expected: &str) -> Result<()> {
        assert_eq!(endpoint().resolve(env, route)?, expected);
        Ok(())
    }

    #[test]
    fn test_override_wins() -> Result<()> {
        let ep = endpoint().with_base_url_override("http://127.0.0.1:8080");
        assert_eq!(ep.resolve(Environment::Sandbox, Route::Client)?, "http://127.0.0.1:8080");
        assert_eq!(ep.resolve(Environment::Production, Route::Production)?, "http://127.0.0.1:8080");
        Ok(())
    }

    #[test]
    fn test_missing_sandbox() {
        let err = Endpoint::new("https://api.example.com")
            .resolve(Environment::Sandbox, Route::Client)
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test_case("https://a/", "/pay/x", "https://a/pay/x")]
    #[test_case("https://a", "pay/x", "https://a/pay/x")]
    #[test_case("https://a/", "pay/x", "https://a/pay/x")]
    #[test_case("https://a", "/v3/x", "https://a/v3/x")]
    #[test_case("https://a/gateway.do", "", "https://a/gateway.do")]
    fn test_join(base: &str, path: &str, expected: &str) {
        assert_eq!(Endpoint::join(base, path), expected);
    }

    #[test_case("sandbox", Environment::Sandbox)]
    #[test_case("Production", Environment::Production)]
    fn test_parse_environment(input: &str, expected: Environment) -> Result<()> {
        assert_eq!(input.parse::<Environment>()?, expected);
        Ok(())
    }
}
