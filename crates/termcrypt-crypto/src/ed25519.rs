use crate::error::CryptoError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Verify an Ed25519 signature over the raw (not pre-hashed) message.
///
/// A public key of the wrong length is an error. A key that is not a valid
/// curve point, or a signature of the wrong length, simply does not verify.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
    let key_bytes: [u8; PUBLIC_KEY_LEN] =
        public_key
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: public_key.len(),
            })?;

    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return Ok(false);
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return Ok(false);
    };

    Ok(key.verify(message, &signature).is_ok())
}
