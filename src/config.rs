//! Front-end configuration.
//!
//! Precedence, highest first: command-line flags (applied by the binary),
//! `SIMPLE_SIGN_*` environment variables, a TOML file, then defaults.

use crate::algorithm::Algorithm;
use crate::error::{Result, SignError};
use crate::store::ArtifactStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "SIMPLE_SIGN_CONFIG";

const ALGORITHM_ENV: &str = "SIMPLE_SIGN_ALGORITHM";
const SIGNER_ID_ENV: &str = "SIMPLE_SIGN_SIGNER_ID";
const ENVELOPE_ENV: &str = "SIMPLE_SIGN_ENVELOPE";
const LOG_ENV: &str = "SIMPLE_SIGN_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Algorithm for newly signed documents.
    pub algorithm: Algorithm,
    /// Also write `<document>.sig.json` when signing.
    pub envelope: bool,
    /// Label recorded in envelopes.
    pub signer_id: Option<String>,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SignError::InvalidConfig(e.to_string()))
    }

    /// Read a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = ArtifactStore::read_all(path)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| SignError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(text)
    }

    /// The file `load` reads: `path`, else `$SIMPLE_SIGN_CONFIG`, else none.
    pub fn source_path(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Load from [`source_path`](Self::source_path), then apply the process
    /// environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::source_path(path) {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from `SIMPLE_SIGN_*` variables returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ALGORITHM_ENV) {
            self.algorithm = value
                .parse()
                .map_err(|e| SignError::InvalidConfig(format!("{}: {}", ALGORITHM_ENV, e)))?;
        }
        if let Some(value) = lookup(SIGNER_ID_ENV) {
            self.signer_id = Some(value);
        }
        if let Some(value) = lookup(ENVELOPE_ENV) {
            self.envelope = parse_bool(&value)
                .ok_or_else(|| SignError::InvalidConfig(format!("{}: expected a boolean, got {:?}", ENVELOPE_ENV, value)))?;
        }
        if let Some(value) = lookup(LOG_ENV) {
            self.log_level = Some(value);
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
