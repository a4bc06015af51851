//! Document signing: read, sign with a fresh key pair, write artifacts.

use crate::algorithm::Algorithm;
use crate::engine::{DetachedSignature, SignatureEngine};
use crate::envelope::SignatureEnvelope;
use crate::error::Result;
use crate::hash::hash_bytes;
use crate::store::ArtifactStore;
use std::path::{Path, PathBuf};

/// Where `sign_document` put the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedArtifacts {
    pub signature_path: PathBuf,
    pub public_key_path: PathBuf,
}

/// A builder for signing documents on disk.
#[derive(Debug, Clone, Default)]
pub struct Signer {
    engine: SignatureEngine,
    signer_id: Option<String>,
}

impl Signer {
    /// Create a signer using the default algorithm.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the signature algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.engine = SignatureEngine::new(algorithm);
        self
    }

    /// Set the signer label written into envelopes.
    pub fn with_signer_id<S: Into<String>>(mut self, signer_id: S) -> Self {
        self.signer_id = Some(signer_id.into());
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.engine.algorithm()
    }

    /// Sign the document at `path`, writing `<path>.sig` and `<path>.pk`.
    ///
    /// Existing artifacts at those paths are replaced.
    pub fn sign_document<P: AsRef<Path>>(&self, path: P) -> Result<SignedArtifacts> {
        let path = path.as_ref();
        let (_, detached) = self.sign_path(path)?;
        self.write_artifacts(path, &detached)
    }

    /// Like [`sign_document`](Self::sign_document), also writing the JSON
    /// envelope to `<path>.sig.json`. Returns the envelope path.
    pub fn sign_document_enveloped<P: AsRef<Path>>(&self, path: P) -> Result<(SignedArtifacts, PathBuf)> {
        let path = path.as_ref();
        let (document, detached) = self.sign_path(path)?;
        let artifacts = self.write_artifacts(path, &detached)?;

        let mut envelope = SignatureEnvelope::new(&document, &detached)?;
        if let Some(signer_id) = &self.signer_id {
            envelope = envelope.with_signer_id(signer_id.clone());
        }
        let envelope_path = ArtifactStore::envelope_path_for(path);
        envelope.save(&envelope_path)?;
        log::info!("wrote envelope {}", envelope_path.display());

        Ok((artifacts, envelope_path))
    }

    fn sign_path(&self, path: &Path) -> Result<(Vec<u8>, DetachedSignature)> {
        let document = ArtifactStore::read_all(path)?;
        log::debug!(
            "signing {} ({} bytes, blake3 {}, {})",
            path.display(),
            document.len(),
            hash_bytes(&document).short(),
            self.algorithm()
        );
        let detached = self.engine.sign_detached(&document)?;
        Ok((document, detached))
    }

    fn write_artifacts(&self, path: &Path, detached: &DetachedSignature) -> Result<SignedArtifacts> {
        let signature_path = ArtifactStore::signature_path_for(path);
        let public_key_path = ArtifactStore::public_key_path_for(path);

        for existing in [&signature_path, &public_key_path] {
            if existing.exists() {
                log::warn!("overwriting {}", existing.display());
            }
        }

        ArtifactStore::write_all(&detached.signature, &signature_path)?;
        ArtifactStore::write_all(&detached.public_key.to_der()?, &public_key_path)?;
        log::info!(
            "signed {} -> {}, {}",
            path.display(),
            signature_path.display(),
            public_key_path.display()
        );

        Ok(SignedArtifacts {
            signature_path,
            public_key_path,
        })
    }
}

/// Sign a document with a fresh default-algorithm key pair.
pub fn sign_document<P: AsRef<Path>>(path: P) -> Result<SignedArtifacts> {
    Signer::new().sign_document(path)
}
