//! Versioned JSON signature envelope.
//!
//! The raw `.sig`/`.pk` pair carries no algorithm tag, signer or time. The
//! envelope is an opt-in companion file (`<document>.sig.json`) that bundles
//! the same signature and public key with an explicit algorithm and version.
//! `signer_id` and `timestamp` are annotations only: nothing signs them.

use crate::algorithm::Algorithm;
use crate::engine::{DetachedSignature, SignatureEngine};
use crate::error::{Result, SignError};
use crate::hash::{hash_bytes, DocumentHash};
use crate::keys::PublicKey;
use crate::store::ArtifactStore;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The current version of the envelope format.
pub const FORMAT_VERSION: &str = "1.0";

/// A detached signature with its public key and descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureEnvelope {
    /// Format version for compatibility.
    pub version: String,

    /// Scheme that produced `signature`.
    pub algorithm: Algorithm,

    /// BLAKE3 fingerprint of the document (base64).
    pub document_hash: String,

    /// SubjectPublicKeyInfo DER of the verifying key (base64).
    pub public_key: String,

    /// Raw signature bytes, identical to the `.sig` artifact (base64).
    pub signature: String,

    /// Optional, unauthenticated signer label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_id: Option<String>,

    /// When the envelope was written. Informational.
    pub timestamp: DateTime<Utc>,
}

impl SignatureEnvelope {
    /// Wrap a detached signature over `document`.
    pub fn new(document: &[u8], detached: &DetachedSignature) -> Result<Self> {
        let engine = base64::engine::general_purpose::STANDARD;
        Ok(Self {
            version: FORMAT_VERSION.to_string(),
            algorithm: detached.public_key.algorithm(),
            document_hash: hash_bytes(document).to_base64(),
            public_key: engine.encode(detached.public_key.to_der()?),
            signature: engine.encode(&detached.signature),
            signer_id: None,
            timestamp: Utc::now(),
        })
    }

    /// Attach a signer label.
    pub fn with_signer_id<S: Into<String>>(mut self, signer_id: S) -> Self {
        self.signer_id = Some(signer_id.into());
        self
    }

    /// Get the document fingerprint.
    pub fn get_hash(&self) -> Result<DocumentHash> {
        DocumentHash::from_base64(&self.document_hash)
    }

    /// Decode the embedded public key.
    pub fn get_public_key(&self) -> Result<PublicKey> {
        let der = base64::engine::general_purpose::STANDARD.decode(&self.public_key)?;
        PublicKey::from_der(&der)
    }

    /// Decode the embedded signature bytes.
    pub fn get_signature_bytes(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.signature)?)
    }

    /// Check the envelope against `document`.
    ///
    /// Returns `Ok(false)` when the document or signature does not match,
    /// and an error when the envelope itself cannot be interpreted.
    pub fn verify(&self, document: &[u8]) -> Result<bool> {
        if self.version != FORMAT_VERSION {
            return Err(SignError::InvalidFormat(format!(
                "unsupported envelope version {}",
                self.version
            )));
        }

        let public_key = self.get_public_key()?;
        if public_key.algorithm() != self.algorithm {
            return Err(SignError::InvalidFormat(format!(
                "envelope declares {} but carries a {} key",
                self.algorithm,
                public_key.algorithm()
            )));
        }
        let signature = self.get_signature_bytes()?;
        let expected_hash = self.get_hash()?;

        if hash_bytes(document) != expected_hash {
            log::debug!("envelope fingerprint mismatch");
            return Ok(false);
        }

        SignatureEngine::new(self.algorithm).verify(document, &signature, &public_key)
    }

    /// Save the envelope as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        ArtifactStore::write_all(json.as_bytes(), path)
    }

    /// Load an envelope from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = ArtifactStore::read_all(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Parse an envelope from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the envelope to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
