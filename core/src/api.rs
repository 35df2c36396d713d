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

use crate::{Context, Result, SignedEnvelope, SigningRequest};
use bytes::Bytes;
use log::debug;
use std::fmt::{Debug, Formatter};

/// SigningCredential is the trait used by the dispatcher as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used by the dispatcher to load the credential.
///
/// Providers differ in what they need: a merchant secret for keyed hashes, an RSA
/// key pair, or an OAuth access token exchanged at runtime.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this loader.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current context.
    ///
    /// Returns `Ok(None)` if this loader has nothing to offer.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// ProvideCredentialChain tries its providers in order until one returns a credential.
///
/// An error from any provider stops the chain and is returned as is.
pub struct ProvideCredentialChain<C: Send + Sync + Unpin + 'static> {
    providers: Vec<Box<dyn ProvideCredential<Credential = C>>>,
}

impl<C: Send + Sync + Unpin + 'static> Default for ProvideCredentialChain<C> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<C: Send + Sync + Unpin + 'static> Debug for ProvideCredentialChain<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers", &self.providers)
            .finish()
    }
}

impl<C: Send + Sync + Unpin + 'static> ProvideCredentialChain<C> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Insert a provider at the front of the chain.
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.insert(0, Box::new(provider));
        self
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait::async_trait]
impl<C: Send + Sync + Unpin + 'static> ProvideCredential for ProvideCredentialChain<C> {
    type Credential = C;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            debug!("trying credential provider: {provider:?}");
            if let Some(cred) = provider.provide_credential(ctx).await? {
                return Ok(Some(cred));
            }
        }
        Ok(None)
    }
}

/// SignRequest turns a [`SigningRequest`] into its signed wire form.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// Implementations MUST:
    ///
    /// - inject identity fields only when `req.options.auto_inject_identity` is set
    /// - leave a caller supplied `sign` untouched
    /// - serialize the transport body, query or headers
    /// - record the produced [`SignedEnvelope`] in `req.envelope` when the request
    ///   carries a signature
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut SigningRequest,
        credential: &Self::Credential,
    ) -> Result<()>;

    /// Check the authenticity of a response.
    ///
    /// - `None`: this provider doesn't sign this kind of response.
    /// - `Some(v)`: the signature was checked, `v.valid` tells the outcome.
    ///
    /// This function never fails, any malformed input counts as a mismatch.
    fn verify_response(
        &self,
        credential: &Self::Credential,
        resp: &http::Response<Bytes>,
    ) -> Option<Verification> {
        let _ = (credential, resp);
        None
    }
}

/// Verification is the outcome of a response authenticity check.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Canonical text and signature extracted from the response.
    pub envelope: SignedEnvelope,
    /// Whether the signature matched.
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Fixed {
        value: Option<&'static str>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ProvideCredential for Fixed {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::credential_invalid("broken"));
            }
            Ok(self.value.map(str::to_string))
        }
    }

    fn fixed(value: Option<&'static str>, fail: bool) -> (Fixed, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Fixed {
                value,
                fail,
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_success() -> Result<()> {
        let (p1, c1) = fixed(None, false);
        let (p2, c2) = fixed(Some("second"), false);
        let (p3, c3) = fixed(Some("third"), false);
        let chain = ProvideCredentialChain::new().push(p1).push(p2).push(p3);

        let cred = chain.provide_credential(&Context::new()).await?;
        assert_eq!(cred.as_deref(), Some("second"));
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(c3.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_chain_push_front_and_errors() -> Result<()> {
        let (p1, _) = fixed(Some("back"), false);
        let (p2, _) = fixed(Some("front"), false);
        let chain = ProvideCredentialChain::new().push(p1).push_front(p2);
        assert_eq!(
            chain.provide_credential(&Context::new()).await?.as_deref(),
            Some("front")
        );

        let (p1, _) = fixed(None, true);
        let chain = ProvideCredentialChain::new().push(p1);
        assert!(chain.provide_credential(&Context::new()).await.is_err());

        let empty = ProvideCredentialChain::<String>::new();
        assert!(empty.is_empty());
        assert_eq!(empty.provide_credential(&Context::new()).await?, None);
        Ok(())
    }
}
