//! Signature verification from artifact files.

use crate::engine::SignatureEngine;
use crate::envelope::SignatureEnvelope;
use crate::error::Result;
use crate::keys::PublicKey;
use crate::store::ArtifactStore;
use std::path::Path;

/// Verifier for detached document signatures.
pub struct Verifier;

impl Verifier {
    /// Verify a document against a signature file and a public key file.
    ///
    /// `Ok(false)` means the signature does not match; unreadable files and
    /// undecodable artifacts are errors.
    pub fn verify_signature<S, K, D>(signature_path: S, public_key_path: K, document_path: D) -> Result<bool>
    where
        S: AsRef<Path>,
        K: AsRef<Path>,
        D: AsRef<Path>,
    {
        let document_path = document_path.as_ref();
        let signature = ArtifactStore::read_all(signature_path.as_ref())?;
        let public_key = PublicKey::from_der(&ArtifactStore::read_all(public_key_path.as_ref())?)?;
        let document = ArtifactStore::read_all(document_path)?;

        let valid = SignatureEngine::new(public_key.algorithm()).verify(&document, &signature, &public_key)?;
        log::info!(
            "{} signature for {} ({})",
            if valid { "valid" } else { "invalid" },
            document_path.display(),
            public_key.algorithm()
        );
        Ok(valid)
    }

    /// Verify a document using the conventional `.sig` and `.pk` paths.
    pub fn verify_document<P: AsRef<Path>>(document_path: P) -> Result<bool> {
        let document_path = document_path.as_ref();
        Self::verify_signature(
            ArtifactStore::signature_path_for(document_path),
            ArtifactStore::public_key_path_for(document_path),
            document_path,
        )
    }

    /// Verify a document against a JSON envelope file.
    pub fn verify_envelope<E: AsRef<Path>, D: AsRef<Path>>(envelope_path: E, document_path: D) -> Result<bool> {
        let envelope = SignatureEnvelope::load(envelope_path)?;
        let document = ArtifactStore::read_all(document_path)?;
        envelope.verify(&document)
    }
}

/// Convenience function to verify a document from its artifact files.
pub fn verify_signature<S, K, D>(signature_path: S, public_key_path: K, document_path: D) -> Result<bool>
where
    S: AsRef<Path>,
    K: AsRef<Path>,
    D: AsRef<Path>,
{
    Verifier::verify_signature(signature_path, public_key_path, document_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignError;
    use crate::signer::sign_document;
    use std::fs;

    #[test]
    fn test_verify_valid_signature() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.pdf");
        fs::write(&doc, b"hello world").unwrap();

        let artifacts = sign_document(&doc).unwrap();

        assert!(verify_signature(&artifacts.signature_path, &artifacts.public_key_path, &doc).unwrap());
        assert!(Verifier::verify_document(&doc).unwrap());
    }

    #[test]
    fn test_verify_tampered_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.pdf");
        fs::write(&doc, b"hello world").unwrap();
        sign_document(&doc).unwrap();

        fs::write(&doc, b"hello world!").unwrap();
        assert!(!Verifier::verify_document(&doc).unwrap());
    }

    #[test]
    fn test_missing_signature_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.pdf");
        fs::write(&doc, b"hello world").unwrap();
        let artifacts = sign_document(&doc).unwrap();
        fs::remove_file(&artifacts.signature_path).unwrap();

        assert!(matches!(
            Verifier::verify_document(&doc),
            Err(SignError::NotFound(ref p)) if p == &artifacts.signature_path
        ));
    }

    #[test]
    fn test_envelope_verification() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.txt");
        fs::write(&doc, b"enveloped").unwrap();

        let (_, envelope_path) = crate::signer::Signer::new().sign_document_enveloped(&doc).unwrap();
        assert!(Verifier::verify_envelope(&envelope_path, &doc).unwrap());

        fs::write(&doc, b"enveloped, then edited").unwrap();
        assert!(!Verifier::verify_envelope(&envelope_path, &doc).unwrap());
    }
}
