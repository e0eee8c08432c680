use crate::error::CryptoError;
use std::fmt;
use std::str::FromStr;

/// Signature algorithms known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// EdDSA over Curve25519 with SHA-512.
    Ed25519,
    /// ECDSA over NIST P-256 (prime256v1).
    Secp256r1,
    /// ECDSA over the Koblitz curve used by Bitcoin.
    Secp256k1,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Ed25519, Algorithm::Secp256r1, Algorithm::Secp256k1];

    /// Lowercase name, as written in option lists.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "ed25519",
            Algorithm::Secp256r1 => "secp256r1",
            Algorithm::Secp256k1 => "secp256k1",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| CryptoError::UnsupportedAlgorithm(s.to_string()))
    }
}
