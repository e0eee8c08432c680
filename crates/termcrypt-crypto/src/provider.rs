use crate::algorithm::Algorithm;
use crate::error::CryptoError;
use crate::hash::{sha256, DIGEST_LEN};
use crate::{ecdsa, ed25519};

/// Hash and signature capability consumed by the logic predicates.
///
/// Implementations must be pure: the same inputs always give the same answer.
pub trait SignatureProvider: Send + Sync {
    /// SHA-256 digest of `data`.
    fn hash(&self, data: &[u8]) -> [u8; DIGEST_LEN];

    /// Check `signature` over `message` with `public_key`.
    ///
    /// `Ok(false)` means the signature does not verify; `Err` means the inputs
    /// could not be interpreted for `algorithm` at all.
    fn verify_signature(
        &self,
        algorithm: Algorithm,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;
}

/// Provider backed by `sha2`, `ed25519-dalek`, `p256` and `k256`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProvider;

impl SignatureProvider for DefaultProvider {
    fn hash(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        sha256(data)
    }

    fn verify_signature(
        &self,
        algorithm: Algorithm,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        match algorithm {
            Algorithm::Ed25519 => ed25519::verify(public_key, message, signature),
            Algorithm::Secp256r1 => ecdsa::verify_secp256r1(public_key, message, signature),
            Algorithm::Secp256k1 => ecdsa::verify_secp256k1(public_key, message, signature),
        }
    }
}
