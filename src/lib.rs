//! # simple-sign
//!
//! Detached document signatures with a fresh key pair per signed document.
//!
//! Signing a document at `P` writes two artifacts next to it:
//!
//! - `P.sig`: the raw signature bytes, no header.
//! - `P.pk`: the public key as X.509 SubjectPublicKeyInfo DER.
//!
//! The private key never leaves the signing call. Anyone holding the
//! document and both artifacts can verify it later.
//!
//! ## Features
//!
//! - **Ed25519ph** (default) and **ECDSA P-256** digest-then-sign schemes
//! - **Self-describing public keys**: the verifier picks the scheme from the
//!   key's OID
//! - **Atomic artifact writes**: a failed write never leaves a partial file
//! - **Optional JSON envelope** (`P.sig.json`) with an explicit algorithm tag
//!
//! ## Sign and Verify Files
//!
//! ```no_run
//! use simple_sign::{sign_document, verify_signature};
//!
//! let artifacts = sign_document("contract.pdf")?;
//! let valid = verify_signature(
//!     &artifacts.signature_path,
//!     &artifacts.public_key_path,
//!     "contract.pdf",
//! )?;
//! assert!(valid);
//! # Ok::<(), simple_sign::SignError>(())
//! ```
//!
//! ## Sign and Verify Bytes
//!
//! ```rust
//! use simple_sign::{Algorithm, SignatureEngine};
//!
//! let engine = SignatureEngine::new(Algorithm::Ed25519);
//! let detached = engine.sign_detached(b"hello world").unwrap();
//!
//! assert!(engine.verify(b"hello world", &detached.signature, &detached.public_key).unwrap());
//! assert!(!engine.verify(b"hello world!", &detached.signature, &detached.public_key).unwrap());
//! ```

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod keys;
pub mod signer;
pub mod store;
pub mod verifier;

// Re-export main types for convenience
pub use algorithm::Algorithm;
pub use config::Config;
pub use engine::{DetachedSignature, SignatureEngine};
pub use envelope::SignatureEnvelope;
pub use error::{ErrorKind, Result, SignError};
pub use hash::{digest_chunks, hash_bytes, DocumentHash, CHUNK_SIZE};
pub use keys::{KeyPair, KeyPairGenerator, PrivateKey, PublicKey};
pub use signer::{sign_document, SignedArtifacts, Signer};
pub use store::ArtifactStore;
pub use verifier::{verify_signature, Verifier};
