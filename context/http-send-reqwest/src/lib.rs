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

//! Reqwest-based HTTP sending implementation for paysign.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `paysign_core`.
//! Requests carrying a [`ClientCertificate`] extension are sent through a
//! dedicated client presenting that certificate, built once per bundle.
//!
//! A reqwest `Client` can't be turned back into a builder, so use
//! [`ReqwestHttpSend::with_builder`] when certificate-gated calls must share the
//! timeout, user agent or proxy of the plain client.
//!
//! ## Example
//!
//! ```no_run
//! use paysign_core::Context;
//! use paysign_http_send_reqwest::ReqwestHttpSend;
//! use reqwest::Client;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), paysign_core::Error> {
//! let send = ReqwestHttpSend::with_builder(|| {
//!     Client::builder()
//!         .timeout(Duration::from_secs(30))
//!         .user_agent("paysign/0.1")
//! })?;
//!
//! let ctx = Context::new().with_http_send(send);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use paysign_core::{ClientCertificate, Error, ErrorKind, HttpSend, Result};
use reqwest::{Certificate, Client, ClientBuilder, Identity, Request};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

type BuilderFn = Arc<dyn Fn() -> ClientBuilder + Send + Sync>;

/// Reqwest-based implementation of the `HttpSend` trait.
pub struct ReqwestHttpSend {
    client: Client,
    /// Settings shared by the mTLS clients.
    builder: BuilderFn,
    /// mTLS clients keyed by certificate bundle fingerprint.
    tls_clients: Mutex<HashMap<String, Client>>,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        Self::new(Client::default())
    }
}

impl Debug for ReqwestHttpSend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpSend")
            .field("client", &self.client)
            .field("tls_clients", &self.tls_clients)
            .finish_non_exhaustive()
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// The client is used for every call that doesn't require a client certificate.
    /// Certificate-gated calls use reqwest's default settings.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            builder: Arc::new(Client::builder),
            tls_clients: Mutex::default(),
        }
    }

    /// Create a new ReqwestHttpSend whose clients are all built from `builder`.
    ///
    /// Certificate-gated clients add their identity and root CA on top of it.
    pub fn with_builder(
        builder: impl Fn() -> ClientBuilder + Send + Sync + 'static,
    ) -> Result<Self> {
        let client = builder()
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;
        Ok(Self {
            client,
            builder: Arc::new(builder),
            tls_clients: Mutex::default(),
        })
    }

    fn client_for(&self, cert: Option<&ClientCertificate>) -> Result<Client> {
        let Some(ClientCertificate(bundle)) = cert else {
            return Ok(self.client.clone());
        };

        let mut clients = self.tls_clients.lock().expect("lock poisoned");
        if let Some(client) = clients.get(bundle.fingerprint()) {
            return Ok(client.clone());
        }

        debug!("building tls client for certificate {}", bundle.fingerprint());
        let identity = Identity::from_pem(&bundle.identity_pem())
            .map_err(|e| Error::certificate("failed to load client identity").with_source(e))?;
        let mut builder = (self.builder)().use_rustls_tls().identity(identity);
        if let Some(root) = bundle.root_ca() {
            let ca = Certificate::from_pem(root.as_bytes())
                .map_err(|e| Error::certificate("failed to load root ca").with_source(e))?;
            builder = builder.add_root_certificate(ca);
        }
        let client = builder
            .build()
            .map_err(|e| Error::certificate("failed to build tls client").with_source(e))?;

        clients.insert(bundle.fingerprint().to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let client = self.client_for(req.extensions().get::<ClientCertificate>())?;

        let req = Request::try_from(req)
            .map_err(|e| Error::invalid_value("failed to build http request").with_source(e))?;
        let resp: http::Response<_> = client
            .execute(req)
            .await
            .map_err(|e| Error::new(ErrorKind::Transport, "failed to send http request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::new(ErrorKind::Transport, "failed to read http response").with_source(e)
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
