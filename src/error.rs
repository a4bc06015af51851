//! Error types for the simple-sign library.

use crate::algorithm::Algorithm;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for simple-sign operations.
#[derive(Error, Debug)]
pub enum SignError {
    /// Error reading or writing a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document or artifact does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The requested algorithm is not available.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The key generator could not be initialized.
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// The private key does not belong to the engine's algorithm.
    #[error("Key mismatch: engine signs with {expected}, key is {actual}")]
    KeyMismatch {
        expected: Algorithm,
        actual: Algorithm,
    },

    /// The signature primitive refused to sign.
    #[error("Signing error: {0}")]
    Signing(#[source] ed25519_dalek::SignatureError),

    /// Public key bytes cannot be decoded.
    #[error("Malformed public key: {0}")]
    MalformedPublicKey(String),

    /// Signature bytes cannot be decoded.
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Invalid envelope format or structure.
    #[error("Invalid envelope format: {0}")]
    InvalidFormat(String),

    /// Error with JSON serialization/deserialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with base64 encoding/decoding.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Configuration file or environment value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Broad failure categories a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Algorithm, provider or configuration unavailable. Not retried.
    Configuration,
    /// Filesystem failure.
    Io,
    /// A signature, public key or envelope could not be decoded.
    MalformedArtifact,
    /// Private key incompatible with the configured algorithm.
    KeyMismatch,
    /// The signing primitive failed.
    Signing,
}

impl SignError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignError::Io { .. } | SignError::NotFound(_) => ErrorKind::Io,
            SignError::UnsupportedAlgorithm(_)
            | SignError::KeyGeneration(_)
            | SignError::InvalidConfig(_) => ErrorKind::Configuration,
            SignError::KeyMismatch { .. } => ErrorKind::KeyMismatch,
            SignError::Signing(_) => ErrorKind::Signing,
            SignError::MalformedPublicKey(_)
            | SignError::MalformedSignature(_)
            | SignError::InvalidFormat(_)
            | SignError::Json(_)
            | SignError::Base64(_) => ErrorKind::MalformedArtifact,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            SignError::NotFound(path)
        } else {
            SignError::Io { path, source }
        }
    }
}

/// Result type alias for simple-sign operations.
pub type Result<T> = std::result::Result<T, SignError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_is_split_out() {
        let err = SignError::io("missing.pdf", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, SignError::NotFound(ref p) if p == &PathBuf::from("missing.pdf")));
        assert_eq!(err.kind(), ErrorKind::Io);

        let err = SignError::io("locked.pdf", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, SignError::Io { .. }));
        assert!(err.to_string().contains("locked.pdf"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            SignError::MalformedPublicKey("x".into()).kind(),
            ErrorKind::MalformedArtifact
        );
        assert_eq!(
            SignError::UnsupportedAlgorithm("dsa".into()).kind(),
            ErrorKind::Configuration
        );
        let mismatch = SignError::KeyMismatch {
            expected: Algorithm::Ed25519,
            actual: Algorithm::EcdsaP256,
        };
        assert_eq!(mismatch.kind(), ErrorKind::KeyMismatch);
        assert_eq!(
            mismatch.to_string(),
            "Key mismatch: engine signs with ed25519, key is ecdsa-p256"
        );
    }
}
