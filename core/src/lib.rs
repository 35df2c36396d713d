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

//! Core components for signing and dispatching payment gateway requests.
//!
//! This crate provides the foundational types and traits for the paysign ecosystem.
//! Provider crates build on them to talk to a specific payment service.
//!
//! ## Overview
//!
//! - **ParameterMap**: the ordered key/value container every request is built from
//! - **Canonicalizer** ([`canonical`]): the sign string and the XML/JSON/form transport forms
//! - **SignAlgorithm**: keyed MD5, keyed HMAC-SHA256, RSA and SM2 signatures
//! - **Dispatcher**: validates, signs, sends and checks one request per call
//! - **CertificateStore**: the client certificate presented on mutual TLS calls
//! - **Context**: file reading, HTTP sending and environment access
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use paysign_core::canonical::{sign_string, to_xml};
//! use paysign_core::{
//!     CallContext, Context, Dispatcher, Endpoint, ParameterMap, ProvideCredential, Result,
//!     SignAlgorithm, SignRequest, SignatureMeta, SignedEnvelope, SigningCredential,
//!     SigningKey, SigningRequest,
//! };
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             secret: "my-secret".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &mut SigningRequest,
//!         cred: &Self::Credential,
//!     ) -> Result<()> {
//!         let canonical = sign_string(&req.params);
//!         let signature =
//!             SignAlgorithm::Md5.sign(canonical.as_bytes(), &SigningKey::secret(&cred.secret))?;
//!         req.params.set("sign", signature.clone());
//!         req.body = Some(to_xml(&req.params)?.into());
//!         req.envelope = Some(SignedEnvelope {
//!             canonical,
//!             signature,
//!             meta: SignatureMeta::new(SignAlgorithm::Md5),
//!         });
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let dispatcher = Dispatcher::new(ctx, MyLoader, MySigner, Endpoint::new("https://example.com"));
//!
//! let req = SigningRequest::post("pay/downloadbill")
//!     .with_params(ParameterMap::new().with("bill_date", "20160405"))
//!     .require(&["bill_date"]);
//! let resp = dispatcher.send(&CallContext::new(), req).await?;
//! println!("{}", resp.text()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`FileRead`]: For asynchronous file reading
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Env`]: For environment variable access
//! - [`ProvideCredential`]: For loading credentials from various sources
//! - [`SignRequest`]: For provider specific signing and response verification
//! - [`SigningCredential`]: For validating credentials
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod canonical;
pub mod hash;
pub mod time;
pub mod utils;

mod api;
pub use api::{
    ProvideCredential, ProvideCredentialChain, SignRequest, SigningCredential, Verification,
};
mod cert;
pub use cert::{CertificateBundle, CertificateStore, ClientCertificate};
mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv,
};
mod dispatch;
pub use dispatch::{CallContext, Canceller, Dispatcher, Response, DEFAULT_TIMEOUT};
mod environment;
pub use environment::{Endpoint, Environment, Route};
mod error;
pub use error::{Error, ErrorKind, Result};
mod params;
pub use params::{ParameterMap, Value};
mod request;
pub use request::{DispatchOptions, SignatureMeta, SignedEnvelope, SigningRequest};
mod sign;
pub use sign::{SignAlgorithm, SigningKey, VerifyingKey, SM2_DEFAULT_DIST_ID};
