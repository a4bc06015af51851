//! Chunked digest feeding and BLAKE3 document fingerprints.

use crate::error::{Result, SignError};
use sha2::Digest;

/// Documents are fed to the digest in blocks of this many bytes.
pub const CHUNK_SIZE: usize = 1024;

/// The size of a BLAKE3 fingerprint in bytes.
pub const HASH_SIZE: usize = 32;

/// Feed `data` into a fresh digest context, [`CHUNK_SIZE`] bytes at a time.
///
/// Chunking adds no framing or padding, so the result equals a single
/// `update(data)`. A new context is built on every call.
pub fn digest_chunks<D: Digest>(data: &[u8]) -> D {
    let mut hasher = D::new();
    for chunk in data.chunks(CHUNK_SIZE) {
        hasher.update(chunk);
    }
    hasher
}

/// A BLAKE3 fingerprint of document content.
///
/// Used for logging and for the envelope's quick mismatch check; it is
/// never the value that gets signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHash([u8; HASH_SIZE]);

impl DocumentHash {
    /// Encode the hash as a base64 string.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    /// Decode a hash from a base64 string.
    pub fn from_base64(s: &str) -> Result<Self> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD.decode(s)?;
        let arr: [u8; HASH_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            SignError::InvalidFormat(format!(
                "Invalid hash length: expected {}, got {}",
                HASH_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Encode the hash as a hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

/// Compute the BLAKE3 fingerprint of a byte slice.
pub fn hash_bytes(data: &[u8]) -> DocumentHash {
    let hash = blake3::hash(data);
    DocumentHash(*hash.as_bytes())
}
