//! ECDSA verification over pre-hashed messages.
//!
//! Both curves take the message digest directly and an ASN.1 DER encoded signature.
//! A digest shorter than 16 bytes never verifies.

use crate::error::CryptoError;
use k256::ecdsa::{Signature as K256Signature, VerifyingKey as K256VerifyingKey};
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature as P256Signature, VerifyingKey as P256VerifyingKey};

/// Length of a SEC1 compressed public key.
pub const COMPRESSED_KEY_LEN: usize = 33;

/// Verify a secp256r1 (P-256) signature.
///
/// The public key must be a 33-byte SEC1 compressed point (ANSI X9.62 §4.3.6).
/// A signature that is not valid DER does not verify.
pub fn verify_secp256r1(
    public_key: &[u8],
    hash: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    if public_key.len() != COMPRESSED_KEY_LEN || !matches!(public_key[0], 0x02 | 0x03) {
        return Err(CryptoError::InvalidPublicKey(format!(
            "secp256r1: expected a {}-byte compressed point, got {} bytes",
            COMPRESSED_KEY_LEN,
            public_key.len()
        )));
    }
    let key = P256VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|_| CryptoError::InvalidPublicKey("secp256r1: point is not on the curve".into()))?;

    let Ok(signature) = P256Signature::from_der(signature) else {
        return Ok(false);
    };

    Ok(key.verify_prehash(hash, &signature).is_ok())
}

/// Verify a secp256k1 signature.
///
/// The public key may be any SEC1 encoding. A signature that is not valid DER is an error.
pub fn verify_secp256k1(
    public_key: &[u8],
    hash: &[u8],
    signature: &[u8],
) -> Result<bool, CryptoError> {
    let key = K256VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|_| CryptoError::InvalidPublicKey(format!(
            "secp256k1: malformed SEC1 point 0x{}",
            hex::encode(public_key)
        )))?;

    let signature = K256Signature::from_der(signature)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(format!("secp256k1: {}", e)))?;

    Ok(key.verify_prehash(hash, &signature).is_ok())
}
