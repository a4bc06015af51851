//! Key pair generation and public key encoding.
//!
//! A fresh [`KeyPair`] is generated for every signed document. The private
//! half is never serialized; the public half is persisted as X.509
//! SubjectPublicKeyInfo DER, whose algorithm OID lets a verifier pick the
//! scheme without any side channel.

use crate::algorithm::{Algorithm, DSA_OID, EC_PUBLIC_KEY_OID, ED25519_OID};
use crate::error::{Result, SignError};
use ed25519_dalek::pkcs8::spki::SubjectPublicKeyInfoRef;
use ed25519_dalek::pkcs8::{DecodePublicKey, EncodePublicKey, ObjectIdentifier};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

/// secp256r1 named curve (RFC 5480).
const P256_CURVE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// Redraws allowed when a random P-256 scalar falls outside `[1, n)`.
const P256_MAX_DRAWS: usize = 8;

/// Produces key pairs for one algorithm from the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPairGenerator {
    algorithm: Algorithm,
}

impl KeyPairGenerator {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Generate a new random key pair.
    ///
    /// Every call draws a new seed from the operating system; a failing
    /// entropy source is reported as [`SignError::KeyGeneration`].
    pub fn generate(&self) -> Result<KeyPair> {
        let private = match self.algorithm {
            Algorithm::Ed25519 => SigningMaterial::Ed25519(generate_ed25519()?),
            Algorithm::EcdsaP256 => SigningMaterial::EcdsaP256(generate_p256()?),
        };
        let public = match &private {
            SigningMaterial::Ed25519(key) => VerifyingMaterial::Ed25519(key.verifying_key()),
            SigningMaterial::EcdsaP256(key) => {
                VerifyingMaterial::EcdsaP256(p256::ecdsa::VerifyingKey::from(key))
            }
        };
        Ok(KeyPair {
            private: PrivateKey { inner: private },
            public: PublicKey { inner: public },
        })
    }
}

fn fill_seed(seed: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(seed)
        .map_err(|e| SignError::KeyGeneration(format!("OS random source unavailable: {}", e)))
}

fn generate_ed25519() -> Result<ed25519_dalek::SigningKey> {
    let mut seed = Zeroizing::new([0u8; ed25519_dalek::SECRET_KEY_LENGTH]);
    fill_seed(&mut seed[..])?;
    Ok(ed25519_dalek::SigningKey::from_bytes(&seed))
}

fn generate_p256() -> Result<p256::ecdsa::SigningKey> {
    let mut seed = Zeroizing::new([0u8; 32]);
    for _ in 0..P256_MAX_DRAWS {
        fill_seed(&mut seed[..])?;
        if let Ok(key) = p256::ecdsa::SigningKey::from_slice(&seed[..]) {
            return Ok(key);
        }
    }
    Err(SignError::KeyGeneration(
        "no valid P-256 scalar drawn from the random source".to_string(),
    ))
}

/// A freshly generated signing key and its public counterpart.
#[derive(Debug)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair for `algorithm`.
    pub fn generate(algorithm: Algorithm) -> Result<Self> {
        KeyPairGenerator::new(algorithm).generate()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.public.algorithm()
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Drop the private key, keeping only what may be persisted.
    pub fn into_public_key(self) -> PublicKey {
        self.public
    }
}

pub(crate) enum SigningMaterial {
    Ed25519(ed25519_dalek::SigningKey),
    EcdsaP256(p256::ecdsa::SigningKey),
}

/// Signing capability. Cannot be encoded or written anywhere.
pub struct PrivateKey {
    inner: SigningMaterial,
}

impl PrivateKey {
    pub fn algorithm(&self) -> Algorithm {
        match self.inner {
            SigningMaterial::Ed25519(_) => Algorithm::Ed25519,
            SigningMaterial::EcdsaP256(_) => Algorithm::EcdsaP256,
        }
    }

    pub(crate) fn material(&self) -> &SigningMaterial {
        &self.inner
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub(crate) enum VerifyingMaterial {
    Ed25519(ed25519_dalek::VerifyingKey),
    EcdsaP256(p256::ecdsa::VerifyingKey),
}

/// Verification capability, persisted as SPKI DER.
#[derive(Clone)]
pub struct PublicKey {
    inner: VerifyingMaterial,
}

impl PublicKey {
    pub fn algorithm(&self) -> Algorithm {
        match self.inner {
            VerifyingMaterial::Ed25519(_) => Algorithm::Ed25519,
            VerifyingMaterial::EcdsaP256(_) => Algorithm::EcdsaP256,
        }
    }

    /// Encode as SubjectPublicKeyInfo DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let document = match &self.inner {
            VerifyingMaterial::Ed25519(key) => key.to_public_key_der(),
            VerifyingMaterial::EcdsaP256(key) => key.to_public_key_der(),
        }
        .map_err(|e| SignError::MalformedPublicKey(format!("cannot encode: {}", e)))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Decode SubjectPublicKeyInfo DER, picking the algorithm from its OID.
    ///
    /// Bytes that are not SPKI at all are [`SignError::MalformedPublicKey`];
    /// well-formed SPKI for a scheme we do not run (legacy DSA, other
    /// curves) is [`SignError::UnsupportedAlgorithm`].
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoRef::try_from(bytes)
            .map_err(|e| SignError::MalformedPublicKey(e.to_string()))?;
        let oid = spki.algorithm.oid;

        let inner = if oid == ED25519_OID {
            let key = ed25519_dalek::VerifyingKey::from_public_key_der(bytes)
                .map_err(|e| SignError::MalformedPublicKey(format!("ed25519: {}", e)))?;
            VerifyingMaterial::Ed25519(key)
        } else if oid == EC_PUBLIC_KEY_OID {
            let curve = spki
                .algorithm
                .parameters_oid()
                .map_err(|e| SignError::MalformedPublicKey(format!("EC parameters: {}", e)))?;
            if curve != P256_CURVE_OID {
                return Err(SignError::UnsupportedAlgorithm(format!("EC curve {}", curve)));
            }
            let key = p256::ecdsa::VerifyingKey::from_public_key_der(bytes)
                .map_err(|e| SignError::MalformedPublicKey(format!("ecdsa-p256: {}", e)))?;
            VerifyingMaterial::EcdsaP256(key)
        } else if oid == DSA_OID {
            return Err(SignError::UnsupportedAlgorithm(
                "legacy DSA public key".to_string(),
            ));
        } else {
            return Err(SignError::UnsupportedAlgorithm(format!("public key OID {}", oid)));
        };

        Ok(Self { inner })
    }

    pub(crate) fn material(&self) -> &VerifyingMaterial {
        &self.inner
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}
