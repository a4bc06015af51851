//! Byte-level file I/O for documents and their derived artifacts.

use crate::error::{Result, SignError};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix appended to a document path for its raw signature.
pub const SIGNATURE_SUFFIX: &str = ".sig";

/// Suffix appended to a document path for its public key.
pub const PUBLIC_KEY_SUFFIX: &str = ".pk";

/// Suffix appended to a document path for the JSON envelope.
pub const ENVELOPE_SUFFIX: &str = ".sig.json";

/// Reads documents and writes artifacts. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactStore;

impl ArtifactStore {
    /// Read the entire file into memory.
    pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).map_err(|e| SignError::io(path, e))
    }

    /// Create or replace `path` with exactly `bytes`.
    ///
    /// The bytes go to a temporary file next to the destination, which is
    /// synced and then renamed into place. Readers see either the old file
    /// or the complete new one, never a partial write.
    pub fn write_all<P: AsRef<Path>>(bytes: &[u8], path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".simple-sign-")
            .tempfile_in(dir)
            .map_err(|e| SignError::io(path, e))?;
        tmp.write_all(bytes).map_err(|e| SignError::io(path, e))?;
        tmp.as_file().sync_all().map_err(|e| SignError::io(path, e))?;
        tmp.persist(path).map_err(|e| SignError::io(path, e.error))?;
        Ok(())
    }

    /// `<document>.sig`
    pub fn signature_path_for<P: AsRef<Path>>(document_path: P) -> PathBuf {
        with_suffix(document_path.as_ref(), SIGNATURE_SUFFIX)
    }

    /// `<document>.pk`
    pub fn public_key_path_for<P: AsRef<Path>>(document_path: P) -> PathBuf {
        with_suffix(document_path.as_ref(), PUBLIC_KEY_SUFFIX)
    }

    /// `<document>.sig.json`
    pub fn envelope_path_for<P: AsRef<Path>>(document_path: P) -> PathBuf {
        with_suffix(document_path.as_ref(), ENVELOPE_SUFFIX)
    }
}

// Appends to the whole path; `Path::set_extension` would replace `.pdf`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
