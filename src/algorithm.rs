//! The fixed set of signature schemes the engine can run.

use crate::error::{Result, SignError};
use ed25519_dalek::pkcs8::ObjectIdentifier;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// id-Ed25519 (RFC 8410).
pub(crate) const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// id-ecPublicKey (RFC 5480). The curve is carried in the SPKI parameters.
pub(crate) const EC_PUBLIC_KEY_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// id-dsa (RFC 3279), produced by legacy SHA1withDSA signers.
pub(crate) const DSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");

/// A digest-then-sign scheme.
///
/// | Algorithm   | Digest  | Signature artifact        |
/// |-------------|---------|---------------------------|
/// | `ed25519`   | SHA-512 | 64 raw bytes (Ed25519ph)  |
/// | `ecdsa-p256`| SHA-256 | ASN.1 DER `(r, s)`        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    Ed25519,
    EcdsaP256,
}

impl Algorithm {
    /// Every algorithm this build can sign and verify with.
    pub const ALL: [Algorithm; 2] = [Algorithm::Ed25519, Algorithm::EcdsaP256];

    /// Canonical kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "ed25519",
            Algorithm::EcdsaP256 => "ecdsa-p256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ed25519" | "ed25519ph" => Ok(Algorithm::Ed25519),
            "ecdsa-p256" | "p256" | "p-256" | "es256" => Ok(Algorithm::EcdsaP256),
            "dsa" | "sha1withdsa" => Err(SignError::UnsupportedAlgorithm(
                "SHA1withDSA is a legacy scheme and is not produced or accepted".to_string(),
            )),
            other => Err(SignError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

// Same names and aliases as `FromStr`, so config files accept what the CLI does.
impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("ed25519".parse::<Algorithm>().unwrap(), Algorithm::Ed25519);
        assert_eq!("P256".parse::<Algorithm>().unwrap(), Algorithm::EcdsaP256);
        assert_eq!(" ecdsa-p256 ".parse::<Algorithm>().unwrap(), Algorithm::EcdsaP256);
    }

    #[test]
    fn test_legacy_and_unknown_rejected() {
        assert!(matches!(
            "SHA1withDSA".parse::<Algorithm>(),
            Err(SignError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            "rsa".parse::<Algorithm>(),
            Err(SignError::UnsupportedAlgorithm(ref name)) if name == "rsa"
        ));
    }

    #[test]
    fn test_display_matches_serde() {
        for algorithm in Algorithm::ALL {
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{}\"", algorithm));
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_deserialize_accepts_aliases() {
        let parsed: Vec<Algorithm> =
            serde_json::from_str(r#"["p256", "ES256", "ed25519ph", "ecdsa-p256"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Algorithm::EcdsaP256,
                Algorithm::EcdsaP256,
                Algorithm::Ed25519,
                Algorithm::EcdsaP256
            ]
        );
        assert!(serde_json::from_str::<Algorithm>("\"dsa\"").is_err());
    }

    #[test]
    fn test_default_is_ed25519() {
        assert_eq!(Algorithm::default(), Algorithm::Ed25519);
    }
}
