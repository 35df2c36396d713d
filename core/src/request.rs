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

use crate::{Endpoint, Environment, ParameterMap, Result, Route, SignAlgorithm};
use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Method, Uri};
use std::str::FromStr;

/// Options controlling how a single call is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Which base URL the call goes to.
    pub route: Route,
    /// Fill merchant identity fields from the credential when absent.
    pub auto_inject_identity: bool,
    /// The call must be sent with the client certificate.
    pub require_cert: bool,
    /// Parameters that must be present and non-empty before anything is signed.
    pub required: Vec<String>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            route: Route::Client,
            auto_inject_identity: true,
            require_cert: false,
            required: Vec::new(),
        }
    }
}

/// Metadata describing how a signature was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMeta {
    /// Algorithm used.
    pub algorithm: SignAlgorithm,
    /// Serial number of the certificate whose key produced the signature.
    pub serial_no: Option<String>,
    /// Nonce bound into the signed message.
    pub nonce: Option<String>,
    /// Timestamp bound into the signed message.
    pub timestamp: Option<String>,
}

impl SignatureMeta {
    /// Create meta for `algorithm` without extra fields.
    pub fn new(algorithm: SignAlgorithm) -> Self {
        Self {
            algorithm,
            serial_no: None,
            nonce: None,
            timestamp: None,
        }
    }
}

/// SignedEnvelope pairs the exact canonical text with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// Text that was signed or verified.
    pub canonical: String,
    /// Signature over `canonical`.
    pub signature: String,
    /// How the signature was produced.
    pub meta: SignatureMeta,
}

/// SigningRequest is the per-call state flowing from the caller through the signer
/// to the transport.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the provider's base URL.
    pub path: String,
    /// Parameters to sign and serialize.
    pub params: ParameterMap,
    /// Raw body, set either by the caller or by the signer.
    pub body: Option<Bytes>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Encoded query string without the leading `?`.
    pub query: Option<String>,
    /// Algorithm requested for this call, provider default if `None`.
    pub algorithm: Option<SignAlgorithm>,
    /// Dispatch options.
    pub options: DispatchOptions,
    /// Environment the call is routed to, set by the dispatcher before signing.
    pub environment: Environment,
    /// Envelope produced by the signer.
    pub envelope: Option<SignedEnvelope>,
}

impl SigningRequest {
    /// Create a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: ParameterMap::new(),
            body: None,
            headers: HeaderMap::new(),
            query: None,
            algorithm: None,
            options: DispatchOptions::default(),
            environment: Environment::Production,
            envelope: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Set the parameters.
    pub fn with_params(mut self, params: ParameterMap) -> Self {
        self.params = params;
        self
    }

    /// Set a raw body that the signer must send as is.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Request a specific algorithm.
    pub fn with_algorithm(mut self, algorithm: SignAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set the route.
    pub fn with_route(mut self, route: Route) -> Self {
        self.options.route = route;
        self
    }

    /// Disable identity injection.
    pub fn without_identity(mut self) -> Self {
        self.options.auto_inject_identity = false;
        self
    }

    /// Require the client certificate.
    pub fn with_cert(mut self) -> Self {
        self.options.require_cert = true;
        self
    }

    /// Declare parameters that must be present and non-empty.
    pub fn require<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.options
            .required
            .extend(keys.iter().map(|k| k.as_ref().to_string()));
        self
    }

    /// Path with the query appended, as sent on the wire.
    pub fn path_and_query(&self) -> String {
        match self.query.as_deref() {
            Some(q) if !q.is_empty() => format!("{}?{q}", self.path),
            _ => self.path.clone(),
        }
    }

    /// Insert a header.
    pub fn header_insert(&mut self, key: HeaderName, value: &str) -> Result<()> {
        self.headers.insert(key, HeaderValue::from_str(value)?);
        Ok(())
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str().map_err(|e| {
                crate::Error::invalid_value(format!("header {key} is not visible ascii"))
                    .with_source(e)
            })?),
            None => Ok(""),
        }
    }

    /// Build the http request against `base_url`.
    pub fn into_http(self, base_url: &str) -> Result<http::Request<Bytes>> {
        let url = Endpoint::join(base_url, &self.path_and_query());
        let uri = Uri::from_str(&url)?;

        let mut req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(self.body.unwrap_or_default())?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let req = SigningRequest::post("pay/downloadbill");
        assert!(req.options.auto_inject_identity);
        assert!(!req.options.require_cert);
        assert_eq!(req.options.route, Route::Client);
        assert!(req.envelope.is_none());
    }

    #[test]
    fn test_into_http() -> Result<()> {
        let mut req = SigningRequest::get("/v3/applyment4sub/applyment/applyment_id/1");
        req.query = Some("a=1".to_string());
        req.header_insert(CONTENT_TYPE, "application/json")?;

        let http_req = req.into_http("https://api.mch.weixin.qq.com")?;
        assert_eq!(
            http_req.uri().to_string(),
            "https://api.mch.weixin.qq.com/v3/applyment4sub/applyment/applyment_id/1?a=1"
        );
        assert_eq!(http_req.headers()[CONTENT_TYPE], "application/json");
        assert!(http_req.body().is_empty());
        Ok(())
    }

    #[test]
    fn test_require_accumulates() {
        let req = SigningRequest::post("x")
            .require(&["nonce_str"])
            .require(&["bill_date", "bill_type"]);
        assert_eq!(
            req.options.required,
            vec!["nonce_str", "bill_date", "bill_type"]
        );
    }
}
