//! Termcrypt Crypto - Hash and signature primitives behind the logic predicates.
//!
//! This crate provides:
//! - SHA-256 hashing
//! - Ed25519 signature verification
//! - ECDSA (secp256r1, secp256k1) verification over pre-hashed messages
//! - The [`SignatureProvider`] seam the predicates are written against

pub mod algorithm;
pub mod hash;
pub mod ed25519;
pub mod ecdsa;
pub mod provider;
pub mod error;

pub use algorithm::Algorithm;
pub use hash::{sha256, DIGEST_LEN};
pub use ecdsa::{verify_secp256k1, verify_secp256r1};
pub use provider::{DefaultProvider, SignatureProvider};
pub use error::CryptoError;
