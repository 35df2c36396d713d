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

//! Client certificates for mutual TLS.

use crate::hash::hex_sha256;
use crate::utils::Redact;
use crate::{Context, Error, Result};
use rsa::pkcs8::der::{pem, Any, Decode, Tag, Tagged};
use rsa::pkcs8::PrivateKeyInfo;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_END: &str = "-----END ";
const PEM_DASHES: &str = "-----";

const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// CertificateBundle is a PEM encoded client identity.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateBundle {
    cert_chain: String,
    private_key: String,
    root_ca: Option<String>,
    fingerprint: String,
}

impl CertificateBundle {
    /// PEM encoded certificate chain.
    pub fn cert_chain(&self) -> &str {
        &self.cert_chain
    }

    /// PEM encoded private key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// PEM encoded root CA to trust in addition to the system roots.
    pub fn root_ca(&self) -> Option<&str> {
        self.root_ca.as_deref()
    }

    /// Stable identity of this bundle, the hex SHA256 of the chain, the key and the root CA.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Identity PEM as expected by TLS stacks: private key followed by the chain.
    pub fn identity_pem(&self) -> Vec<u8> {
        let mut pem = Vec::with_capacity(self.private_key.len() + self.cert_chain.len() + 1);
        pem.extend_from_slice(self.private_key.as_bytes());
        if !self.private_key.ends_with('\n') {
            pem.push(b'\n');
        }
        pem.extend_from_slice(self.cert_chain.as_bytes());
        pem
    }
}

impl Debug for CertificateBundle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateBundle")
            .field("fingerprint", &self.fingerprint)
            .field("private_key", &Redact::from(&self.private_key))
            .field("root_ca", &self.root_ca.is_some())
            .finish()
    }
}

/// CertificateStore holds the client certificate of a dispatcher.
///
/// The bundle is loaded once and never reloaded. Clones share the same bundle.
#[derive(Debug, Clone)]
pub struct CertificateStore {
    bundle: Arc<CertificateBundle>,
}

impl CertificateStore {
    /// Load a store from PEM content.
    ///
    /// Every PEM block is decoded and its DER checked, so malformed material fails here
    /// instead of on the first call that needs it.
    pub fn load(cert_chain: &str, private_key: &str, root_ca: Option<&str>) -> Result<Self> {
        check_certificates(cert_chain, "certificate chain")?;
        check_private_key(private_key)?;
        if let Some(root) = root_ca {
            check_certificates(root, "root ca")?;
        }

        let mut identity = Vec::new();
        for part in [Some(cert_chain), Some(private_key), root_ca].into_iter().flatten() {
            identity.extend_from_slice(part.as_bytes());
            identity.push(0);
        }

        Ok(Self {
            bundle: Arc::new(CertificateBundle {
                fingerprint: hex_sha256(&identity),
                cert_chain: cert_chain.to_string(),
                private_key: private_key.to_string(),
                root_ca: root_ca.map(str::to_string),
            }),
        })
    }

    /// Load a store from files through the context's file reader.
    pub async fn load_from_files(
        ctx: &Context,
        cert_path: &str,
        key_path: &str,
        root_ca_path: Option<&str>,
    ) -> Result<Self> {
        let read = |path: &str| {
            let path = path.to_string();
            async move {
                ctx.file_read_as_string(&path).await.map_err(|e| {
                    Error::certificate(format!("failed to read {path}")).with_source(e)
                })
            }
        };

        let cert = read(cert_path).await?;
        let key = read(key_path).await?;
        let root = match root_ca_path {
            Some(p) => Some(read(p).await?),
            None => None,
        };
        Self::load(&cert, &key, root.as_deref())
    }

    /// Get the loaded bundle.
    pub fn bundle(&self) -> Arc<CertificateBundle> {
        self.bundle.clone()
    }
}

/// Decode every PEM block of `content` into its label and DER bytes.
fn pem_blocks(content: &str, what: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let mut blocks = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find(PEM_BEGIN) {
        let block = &rest[start..];
        let end = block
            .find(PEM_END)
            .and_then(|pos| {
                let tail = pos + PEM_END.len();
                block[tail..]
                    .find(PEM_DASHES)
                    .map(|dashes| tail + dashes + PEM_DASHES.len())
            })
            .ok_or_else(|| Error::certificate(format!("{what} has an unterminated PEM block")))?;

        let (label, der) = pem::decode_vec(block[..end].as_bytes()).map_err(|e| {
            Error::certificate(format!("{what} is not valid PEM")).with_source(e)
        })?;
        blocks.push((label.to_string(), der));
        rest = &block[end..];
    }

    if blocks.is_empty() {
        return Err(Error::certificate(format!("{what} contains no PEM block")));
    }
    Ok(blocks)
}

fn is_der_sequence(der: &[u8]) -> bool {
    Any::from_der(der)
        .map(|v| v.tag() == Tag::Sequence)
        .unwrap_or(false)
}

fn check_certificates(content: &str, what: &str) -> Result<()> {
    for (label, der) in pem_blocks(content, what)? {
        if label != CERTIFICATE_LABEL {
            return Err(Error::certificate(format!(
                "{what} contains a {label} block instead of a certificate"
            )));
        }
        if !is_der_sequence(&der) {
            return Err(Error::certificate(format!("{what} holds a malformed certificate")));
        }
    }
    Ok(())
}

fn check_private_key(content: &str) -> Result<()> {
    let blocks = pem_blocks(content, "private key")?;
    let [(label, der)] = blocks.as_slice() else {
        return Err(Error::certificate("private key must hold exactly one PEM block"));
    };

    let valid = match label.as_str() {
        "PRIVATE KEY" => PrivateKeyInfo::try_from(der.as_slice()).is_ok(),
        "RSA PRIVATE KEY" => rsa::pkcs1::RsaPrivateKey::try_from(der.as_slice()).is_ok(),
        "EC PRIVATE KEY" => is_der_sequence(der),
        _ => {
            return Err(Error::certificate(format!(
                "private key has unsupported PEM label {label}"
            )))
        }
    };
    if !valid {
        return Err(Error::certificate("private key is malformed"));
    }
    Ok(())
}

/// ClientCertificate is the request extension that asks the transport to present
/// a client certificate.
#[derive(Debug, Clone)]
pub struct ClientCertificate(pub Arc<CertificateBundle>);
