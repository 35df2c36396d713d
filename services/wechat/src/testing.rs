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

//! Shared test helpers.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use paysign_core::{ClientCertificate, HttpSend, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: http::Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub cert: Option<String>,
}

/// MockHttpSend answers every call with the same response and records the last request.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<Captured>>>,
}

impl MockHttpSend {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
            calls: Arc::default(),
            last: Arc::default(),
        }
    }

    pub fn with_header(mut self, key: &'static str, value: &str) -> Self {
        self.headers
            .insert(key, value.parse().expect("header value must be valid"));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Captured {
        self.last
            .lock()
            .unwrap()
            .clone()
            .expect("a request must have been sent")
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(Captured {
            method: req.method().clone(),
            uri: req.uri().to_string(),
            headers: req.headers().clone(),
            body: req.body().clone(),
            cert: req
                .extensions()
                .get::<ClientCertificate>()
                .map(|c| c.0.fingerprint().to_string()),
        });

        let mut resp = http::Response::builder()
            .status(self.status)
            .body(self.body.clone())?;
        *resp.headers_mut() = self.headers.clone();
        Ok(resp)
    }
}
