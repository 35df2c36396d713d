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

//! Signature algorithms and key material.

use crate::hash::{base64_decode, base64_encode, hex_hmac_sha256_upper, hex_md5_upper};
use crate::utils::Redact;
use crate::{Error, Result};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::Sha256;
use rsa::signature::{Keypair, SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Distinguishing identifier used for SM2 signatures when the remote service
/// doesn't specify one.
pub const SM2_DEFAULT_DIST_ID: &str = "1234567812345678";

/// SignAlgorithm is the closed set of signature algorithms.
///
/// Adding a variant here forces every provider to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignAlgorithm {
    /// Keyed MD5: `MD5(content + "&key=" + secret)`, upper-case hex.
    Md5,
    /// Keyed HMAC-SHA256: `HMAC(secret, content + "&key=" + secret)`, upper-case hex.
    HmacSha256,
    /// RSA PKCS#1 v1.5 with SHA-256, base64 signature.
    Rsa,
    /// SM2 with SM3 digest, base64 of the 64 bytes `r || s` signature.
    Sm2,
}

impl SignAlgorithm {
    /// Wire tag of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignAlgorithm::Md5 => "MD5",
            SignAlgorithm::HmacSha256 => "HMAC-SHA256",
            SignAlgorithm::Rsa => "RSA2",
            SignAlgorithm::Sm2 => "SM2",
        }
    }

    /// Check if this algorithm is keyed by a shared secret.
    pub fn is_keyed_hash(&self) -> bool {
        matches!(self, SignAlgorithm::Md5 | SignAlgorithm::HmacSha256)
    }

    /// Sign `content` with `key`.
    ///
    /// Fails with [`ErrorKind::Signing`](crate::ErrorKind::Signing) only when the key
    /// doesn't fit this algorithm. Empty content is signed like any other.
    pub fn sign(&self, content: &[u8], key: &SigningKey) -> Result<String> {
        match (self, key) {
            (SignAlgorithm::Md5, SigningKey::Secret(secret)) => {
                Ok(hex_md5_upper(&keyed_content(content, secret)?))
            }
            (SignAlgorithm::HmacSha256, SigningKey::Secret(secret)) => Ok(hex_hmac_sha256_upper(
                secret.as_bytes(),
                &keyed_content(content, secret)?,
            )),
            (SignAlgorithm::Rsa, SigningKey::Rsa(sk)) => {
                let signature = sk
                    .try_sign(content)
                    .map_err(|e| Error::signing("rsa signing failed").with_source(e))?;
                Ok(base64_encode(&signature.to_bytes()))
            }
            (SignAlgorithm::Sm2, SigningKey::Sm2(sk)) => {
                let signature: sm2::dsa::Signature = sk
                    .try_sign(content)
                    .map_err(|e| Error::signing("sm2 signing failed").with_source(e))?;
                Ok(base64_encode(&signature.to_bytes()))
            }
            (alg, key) => Err(Error::signing(format!(
                "algorithm {alg} can't sign with {} key material",
                key.kind()
            ))),
        }
    }

    /// Verify `signature` over `content` with `key`.
    ///
    /// Returns false on any mismatch, including malformed signatures and keys that
    /// don't fit this algorithm.
    pub fn verify(&self, content: &[u8], signature: &str, key: &VerifyingKey) -> bool {
        match (self, key) {
            (SignAlgorithm::Md5 | SignAlgorithm::HmacSha256, VerifyingKey::Secret(secret)) => {
                let signing_key = SigningKey::Secret(secret.clone());
                match self.sign(content, &signing_key) {
                    // Digests are upper hex, compare in constant time after normalizing.
                    Ok(expected) => expected
                        .as_bytes()
                        .ct_eq(signature.to_ascii_uppercase().as_bytes())
                        .into(),
                    Err(_) => false,
                }
            }
            (SignAlgorithm::Rsa, VerifyingKey::Rsa(vk)) => {
                let Ok(bs) = base64_decode(signature) else {
                    return false;
                };
                let Ok(signature) = rsa::pkcs1v15::Signature::try_from(bs.as_slice()) else {
                    return false;
                };
                vk.verify(content, &signature).is_ok()
            }
            (SignAlgorithm::Sm2, VerifyingKey::Sm2(vk)) => {
                let Ok(bs) = base64_decode(signature) else {
                    return false;
                };
                let Ok(signature) = sm2::dsa::Signature::try_from(bs.as_slice()) else {
                    return false;
                };
                vk.verify(content, &signature).is_ok()
            }
            _ => false,
        }
    }
}

impl Display for SignAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(SignAlgorithm::Md5),
            "HMAC-SHA256" => Ok(SignAlgorithm::HmacSha256),
            "RSA2" => Ok(SignAlgorithm::Rsa),
            "SM2" => Ok(SignAlgorithm::Sm2),
            _ => Err(Error::invalid_value(format!(
                "unsupported sign algorithm: {s}"
            ))),
        }
    }
}

fn keyed_content(content: &[u8], secret: &str) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(Error::signing("secret key is empty"));
    }
    let mut bs = Vec::with_capacity(content.len() + secret.len() + 5);
    bs.extend_from_slice(content);
    bs.extend_from_slice(b"&key=");
    bs.extend_from_slice(secret.as_bytes());
    Ok(bs)
}

/// Key material used to sign outgoing requests.
#[derive(Clone)]
pub enum SigningKey {
    /// Shared secret for keyed hash algorithms.
    Secret(String),
    /// RSA private key.
    Rsa(rsa::pkcs1v15::SigningKey<Sha256>),
    /// SM2 private key.
    Sm2(sm2::dsa::SigningKey),
}

impl SigningKey {
    /// Build a shared secret key.
    pub fn secret(secret: impl Into<String>) -> Self {
        SigningKey::Secret(secret.into())
    }

    /// Load an RSA private key from PKCS#8 or PKCS#1 PEM.
    pub fn rsa_from_pem(pem: &str) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| Error::signing("failed to read rsa private key").with_source(e))?;
        Ok(SigningKey::Rsa(rsa::pkcs1v15::SigningKey::new(key)))
    }

    /// Load an SM2 private key from its hex encoded scalar.
    pub fn sm2_from_hex(hex_key: &str) -> Result<Self> {
        let bs = hex::decode(hex_key.trim())
            .map_err(|e| Error::signing("sm2 private key is not hex").with_source(e))?;
        let secret = sm2::SecretKey::from_slice(&bs)
            .map_err(|e| Error::signing("failed to read sm2 private key").with_source(e))?;
        let key = sm2::dsa::SigningKey::new(SM2_DEFAULT_DIST_ID, &secret)
            .map_err(|e| Error::signing("failed to build sm2 signing key").with_source(e))?;
        Ok(SigningKey::Sm2(key))
    }

    /// Derive the key that verifies signatures made by this key.
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            SigningKey::Secret(s) => VerifyingKey::Secret(s.clone()),
            SigningKey::Rsa(sk) => VerifyingKey::Rsa(sk.verifying_key()),
            SigningKey::Sm2(sk) => VerifyingKey::Sm2(sk.verifying_key().clone()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SigningKey::Secret(_) => "secret",
            SigningKey::Rsa(_) => "rsa",
            SigningKey::Sm2(_) => "sm2",
        }
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningKey::Secret(s) => f.debug_tuple("Secret").field(&Redact::from(s)).finish(),
            SigningKey::Rsa(_) => f.write_str("Rsa(***)"),
            SigningKey::Sm2(_) => f.write_str("Sm2(***)"),
        }
    }
}

/// Key material used to verify signatures made by a remote service.
#[derive(Clone)]
pub enum VerifyingKey {
    /// Shared secret for keyed hash algorithms.
    Secret(String),
    /// RSA public key.
    Rsa(rsa::pkcs1v15::VerifyingKey<Sha256>),
    /// SM2 public key.
    Sm2(sm2::dsa::VerifyingKey),
}

impl VerifyingKey {
    /// Load an RSA public key from SPKI or PKCS#1 PEM.
    pub fn rsa_from_pem(pem: &str) -> Result<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| Error::signing("failed to read rsa public key").with_source(e))?;
        Ok(VerifyingKey::Rsa(rsa::pkcs1v15::VerifyingKey::new(key)))
    }

    /// Load an SM2 public key from its hex encoded SEC1 point.
    pub fn sm2_from_hex(hex_key: &str) -> Result<Self> {
        let bs = hex::decode(hex_key.trim())
            .map_err(|e| Error::signing("sm2 public key is not hex").with_source(e))?;
        let public = sm2::PublicKey::from_sec1_bytes(&bs)
            .map_err(|e| Error::signing("failed to read sm2 public key").with_source(e))?;
        let key = sm2::dsa::VerifyingKey::new(SM2_DEFAULT_DIST_ID, public)
            .map_err(|e| Error::signing("failed to build sm2 verifying key").with_source(e))?;
        Ok(VerifyingKey::Sm2(key))
    }
}

impl Debug for VerifyingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyingKey::Secret(s) => f.debug_tuple("Secret").field(&Redact::from(s)).finish(),
            VerifyingKey::Rsa(_) => f.write_str("Rsa"),
            VerifyingKey::Sm2(_) => f.write_str("Sm2"),
        }
    }
}
