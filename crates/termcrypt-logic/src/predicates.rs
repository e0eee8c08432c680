//! The predicates exposed to the logic engine.
//!
//! | Predicate | Mode | Determinism |
//! |---|---|---|
//! | `sha_hash(+Data, ?Hash)` | `Data` is an atom, hashed as UTF-8 text | det |
//! | `hex_bytes(?Hex, ?Bytes)` | at least one side is bound | det |
//! | `eddsa_verify(+PubKey, +Data, +Signature, +Options)` | `type(ed25519)` | semidet |
//! | `ecdsa_verify(+PubKey, +Data, +Signature, +Options)` | `type(secp256r1 \| secp256k1)` | semidet |
//!
//! For the verification predicates `PubKey` and `Signature` are byte lists;
//! `Data` is decoded according to `encoding(hex | octet)` (default `hex`).
//! ECDSA expects `Data` to be the message digest and a DER encoded signature.

use crate::codec::{bytes_to_hex_atom, bytes_to_list, TermCodec};
use crate::config::LogicConfig;
use crate::engine::{unify, Cont, Promise};
use crate::error::{ErrorKind, LogicError, Stage};
use crate::options::resolve_to_atom;
use crate::verify::{VerifyFamily, VerifyRequest, ECDSA, EDDSA};
use std::fmt;
use std::sync::Arc;
use termcrypt_crypto::{DefaultProvider, SignatureProvider};
use termcrypt_types::{Env, Term, ValidType};

const SHA_HASH: &str = "sha_hash/2";
const HEX_BYTES: &str = "hex_bytes/2";

/// How many solutions a predicate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determinism {
    /// Exactly one solution (or an error).
    Det,
    /// At most one solution.
    SemiDet,
}

/// Registration entry for one predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateInfo {
    pub name: &'static str,
    pub arity: usize,
    pub determinism: Determinism,
}

impl fmt::Display for PredicateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

pub const PREDICATES: [PredicateInfo; 4] = [
    PredicateInfo {
        name: "sha_hash",
        arity: 2,
        determinism: Determinism::Det,
    },
    PredicateInfo {
        name: "hex_bytes",
        arity: 2,
        determinism: Determinism::Det,
    },
    PredicateInfo {
        name: "eddsa_verify",
        arity: 4,
        determinism: Determinism::SemiDet,
    },
    PredicateInfo {
        name: "ecdsa_verify",
        arity: 4,
        determinism: Determinism::SemiDet,
    },
];

/// Cryptographic predicates bound to a signature provider.
#[derive(Clone)]
pub struct CryptoPredicates {
    provider: Arc<dyn SignatureProvider>,
    codec: TermCodec,
}

impl fmt::Debug for CryptoPredicates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoPredicates")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl Default for CryptoPredicates {
    fn default() -> Self {
        Self::new(Arc::new(DefaultProvider), &LogicConfig::default())
    }
}

impl CryptoPredicates {
    pub fn new(provider: Arc<dyn SignatureProvider>, config: &LogicConfig) -> Self {
        Self {
            provider,
            codec: TermCodec::new(config.max_bytes),
        }
    }

    /// Dispatch a call by predicate name.
    ///
    /// Returns `None` for an unknown name or an argument count that does not match.
    pub fn call(&self, name: &str, args: &[Term], cont: Cont, env: &Env) -> Option<Promise> {
        let promise = match (name, args) {
            ("sha_hash", [data, hash]) => self.sha_hash(data, hash, cont, env),
            ("hex_bytes", [hex, bytes]) => self.hex_bytes(hex, bytes, cont, env),
            ("eddsa_verify", [key, data, signature, options]) => {
                self.eddsa_verify(key, data, signature, options, cont, env)
            }
            ("ecdsa_verify", [key, data, signature, options]) => {
                self.ecdsa_verify(key, data, signature, options, cont, env)
            }
            _ => return None,
        };
        Some(promise)
    }

    /// `sha_hash(+Data, ?Hash)`: SHA-256 of the atom text, as a byte list.
    pub fn sha_hash(&self, data: &Term, hash: &Term, cont: Cont, env: &Env) -> Promise {
        let provider = self.provider.clone();
        let (data, hash, env) = (data.clone(), hash.clone(), env.clone());

        Promise::delay(move |_| {
            let text = match resolve_to_atom(&data, &env) {
                Ok(text) => text,
                Err(kind) => return Promise::error(LogicError::new(SHA_HASH, Stage::Arguments, kind)),
            };
            let digest = provider.hash(text.as_str().as_bytes());
            tracing::debug!("{}: hashed {} bytes", SHA_HASH, text.as_str().len());
            unify(&hash, &bytes_to_list(&digest), cont, &env)
        })
    }

    /// `hex_bytes(?Hex, ?Bytes)`: convert between a hex atom and a byte list.
    ///
    /// When `Hex` is bound it is decoded and `Bytes` is unified with the result,
    /// so a bound `Bytes` is checked by unification. Otherwise `Bytes` is encoded
    /// to lowercase hex and unified with `Hex`.
    pub fn hex_bytes(&self, hex: &Term, bytes: &Term, cont: Cont, env: &Env) -> Promise {
        let codec = self.codec;
        let (hex, bytes, env) = (hex.clone(), bytes.clone(), env.clone());

        Promise::delay(move |_| {
            eval_hex_bytes(&codec, &hex, &bytes, cont, &env).unwrap_or_else(Promise::error)
        })
    }

    /// `eddsa_verify(+PubKey, +Data, +Signature, +Options)`
    pub fn eddsa_verify(
        &self,
        key: &Term,
        data: &Term,
        signature: &Term,
        options: &Term,
        cont: Cont,
        env: &Env,
    ) -> Promise {
        self.x_verify(EDDSA, request(key, data, signature, options), cont, env)
    }

    /// `ecdsa_verify(+PubKey, +Data, +Signature, +Options)`
    pub fn ecdsa_verify(
        &self,
        key: &Term,
        data: &Term,
        signature: &Term,
        options: &Term,
        cont: Cont,
        env: &Env,
    ) -> Promise {
        self.x_verify(ECDSA, request(key, data, signature, options), cont, env)
    }

    /// Verification for any family: succeeds once with unchanged bindings, or fails.
    pub fn x_verify(&self, family: VerifyFamily, request: VerifyRequest, cont: Cont, env: &Env) -> Promise {
        let provider = self.provider.clone();
        let codec = self.codec;
        let env = env.clone();

        Promise::delay(move |_| match family.verify(&request, provider.as_ref(), &codec, &env) {
            Ok(true) => cont(env),
            Ok(false) => Promise::Bool(false),
            Err(err) => Promise::error(err),
        })
    }
}

fn request(key: &Term, data: &Term, signature: &Term, options: &Term) -> VerifyRequest {
    VerifyRequest {
        key: key.clone(),
        data: data.clone(),
        signature: signature.clone(),
        options: options.clone(),
    }
}

fn eval_hex_bytes(
    codec: &TermCodec,
    hex: &Term,
    bytes: &Term,
    cont: Cont,
    env: &Env,
) -> Result<Promise, LogicError> {
    let fail = |stage: Stage| move |kind: ErrorKind| LogicError::new(HEX_BYTES, stage, kind);

    match env.resolve(hex) {
        Term::Atom(text) => {
            let decoded = codec.decode_hex(&text).map_err(fail(Stage::Hex))?;
            let target = env.resolve(bytes);
            if !target.is_variable() && !target.is_list_like() {
                return Err(fail(Stage::Arguments)(ErrorKind::Type {
                    expected: ValidType::List,
                    culprit: target,
                }));
            }
            Ok(unify(bytes, &bytes_to_list(&decoded), cont, env))
        }
        Term::Variable(_) => match env.resolve(bytes) {
            unbound @ Term::Variable(_) => Err(fail(Stage::Arguments)(ErrorKind::Instantiation(unbound))),
            list if list.is_list_like() => {
                let decoded = codec.list_to_bytes(&list, env).map_err(fail(Stage::Bytes))?;
                Ok(unify(hex, &bytes_to_hex_atom(&decoded), cont, env))
            }
            other => Err(fail(Stage::Arguments)(ErrorKind::Type {
                expected: ValidType::List,
                culprit: other,
            })),
        },
        other => Err(fail(Stage::Arguments)(ErrorKind::Type {
            expected: ValidType::Atom,
            culprit: other,
        })),
    }
}
