//! Termcrypt Logic - Cryptographic predicates for a logic engine.
//!
//! This crate provides:
//! - A term codec between byte sequences and hex atoms / octet lists
//! - Option-list resolution (`encoding(hex)`, `type(ed25519)`, ...)
//! - A generic signature verification dispatcher parameterized by algorithm family
//! - The predicates `sha_hash/2`, `hex_bytes/2`, `eddsa_verify/4`, `ecdsa_verify/4`
//!
//! Predicates never do work eagerly: each returns a [`Promise`] that the host
//! forces when it chooses to run the goal.

pub mod engine;
pub mod codec;
pub mod options;
pub mod verify;
pub mod predicates;
pub mod config;
pub mod telemetry;
pub mod error;

pub use engine::{solve, unify, Cont, Context, Promise};
pub use codec::{bytes_to_hex_atom, bytes_to_list, Encoding, TermCodec, DEFAULT_MAX_BYTES};
pub use options::{get_option_or_default, resolve_to_atom};
pub use verify::{VerifyFamily, VerifyRequest, ECDSA, EDDSA};
pub use predicates::{CryptoPredicates, Determinism, PredicateInfo, PREDICATES};
pub use config::{LogicConfig, LoggingConfig};
pub use error::{EngineError, ErrorKind, LogicError, Stage};
