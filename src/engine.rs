//! Digest-then-sign and digest-then-verify over whole documents.

use crate::algorithm::Algorithm;
use crate::error::{Result, SignError};
use crate::hash::digest_chunks;
use crate::keys::{KeyPairGenerator, PrivateKey, PublicKey, SigningMaterial, VerifyingMaterial};
use p256::ecdsa::signature::{DigestSigner, DigestVerifier};
use sha2::{Sha256, Sha512};

/// Raw signature bytes together with the public key that checks them.
#[derive(Debug, Clone)]
pub struct DetachedSignature {
    pub signature: Vec<u8>,
    pub public_key: PublicKey,
}

/// Signs and verifies documents with one configured algorithm.
///
/// The engine holds no mutable state: each call builds its own digest
/// context, so one engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureEngine {
    algorithm: Algorithm,
}

impl SignatureEngine {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign the full content of `document`.
    ///
    /// Fails with [`SignError::KeyMismatch`] when `private_key` belongs to a
    /// different algorithm than the engine.
    pub fn sign(&self, document: &[u8], private_key: &PrivateKey) -> Result<Vec<u8>> {
        if private_key.algorithm() != self.algorithm {
            return Err(SignError::KeyMismatch {
                expected: self.algorithm,
                actual: private_key.algorithm(),
            });
        }

        match private_key.material() {
            SigningMaterial::Ed25519(key) => {
                let digest = digest_chunks::<Sha512>(document);
                let signature = key
                    .sign_prehashed(digest, None)
                    .map_err(SignError::Signing)?;
                Ok(signature.to_bytes().to_vec())
            }
            SigningMaterial::EcdsaP256(key) => {
                let digest = digest_chunks::<Sha256>(document);
                let signature: p256::ecdsa::Signature =
                    key.try_sign_digest(digest).map_err(SignError::Signing)?;
                // Emit low-S only; verify rejects the high-S twin.
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }

    /// Generate a one-off key pair, sign `document`, and discard the
    /// private key before returning.
    pub fn sign_detached(&self, document: &[u8]) -> Result<DetachedSignature> {
        let keypair = KeyPairGenerator::new(self.algorithm).generate()?;
        let signature = self.sign(document, keypair.private_key())?;
        Ok(DetachedSignature {
            signature,
            public_key: keypair.into_public_key(),
        })
    }

    /// Check `signature` over `document` against `public_key`.
    ///
    /// The scheme is taken from the key, not from the engine. A signature
    /// that simply does not match, or an ECDSA signature with a high `s`,
    /// is `Ok(false)`; bytes that cannot be a signature for the key's scheme
    /// are [`SignError::MalformedSignature`].
    pub fn verify(&self, document: &[u8], signature: &[u8], public_key: &PublicKey) -> Result<bool> {
        match public_key.material() {
            VerifyingMaterial::Ed25519(key) => {
                let signature = ed25519_dalek::Signature::from_slice(signature).map_err(|_| {
                    SignError::MalformedSignature(format!(
                        "ed25519 signature must be {} bytes, got {}",
                        ed25519_dalek::SIGNATURE_LENGTH,
                        signature.len()
                    ))
                })?;
                let digest = digest_chunks::<Sha512>(document);
                Ok(key.verify_prehashed_strict(digest, None, &signature).is_ok())
            }
            VerifyingMaterial::EcdsaP256(key) => {
                let signature = p256::ecdsa::Signature::from_der(signature).map_err(|e| {
                    SignError::MalformedSignature(format!("ecdsa-p256 DER: {}", e))
                })?;
                if signature.normalize_s().is_some() {
                    return Ok(false);
                }
                let digest = digest_chunks::<Sha256>(document);
                Ok(key.verify_digest(digest, &signature).is_ok())
            }
        }
    }

    /// Like [`verify`](Self::verify), decoding the SPKI DER public key first.
    pub fn verify_encoded(&self, document: &[u8], signature: &[u8], public_key_der: &[u8]) -> Result<bool> {
        let public_key = PublicKey::from_der(public_key_der)?;
        self.verify(document, signature, &public_key)
    }
}
