//! Generic signature verification shared by every algorithm family.
//!
//! A [`VerifyFamily`] names the algorithms a predicate accepts, its default, and
//! how keys and signatures are decoded. Only the message honors the caller's
//! `encoding` option; keys and signatures always use the family's fixed encoding.

use crate::codec::{Encoding, TermCodec};
use crate::error::{ErrorKind, LogicError, Stage};
use crate::options::{get_option_or_default, resolve_to_atom};
use termcrypt_crypto::{Algorithm, SignatureProvider};
use termcrypt_types::{Atom, Env, Term};

/// Name of the option selecting the algorithm within a family.
pub const TYPE_OPTION: &str = "type";

/// Algorithm family accepted by one verification predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyFamily {
    /// Predicate indicator used in diagnostics.
    pub functor: &'static str,
    pub algorithms: &'static [Algorithm],
    pub default: Algorithm,
    pub key_encoding: Encoding,
    pub signature_encoding: Encoding,
}

/// `eddsa_verify/4`
pub const EDDSA: VerifyFamily = VerifyFamily {
    functor: "eddsa_verify/4",
    algorithms: &[Algorithm::Ed25519],
    default: Algorithm::Ed25519,
    key_encoding: Encoding::Octet,
    signature_encoding: Encoding::Octet,
};

/// `ecdsa_verify/4`
pub const ECDSA: VerifyFamily = VerifyFamily {
    functor: "ecdsa_verify/4",
    algorithms: &[Algorithm::Secp256r1, Algorithm::Secp256k1],
    default: Algorithm::Secp256r1,
    key_encoding: Encoding::Octet,
    signature_encoding: Encoding::Octet,
};

/// Arguments of a verification predicate, as supplied by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyRequest {
    pub key: Term,
    pub data: Term,
    pub signature: Term,
    pub options: Term,
}

impl VerifyFamily {
    pub fn permitted_names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(Algorithm::as_str).collect()
    }

    /// Map an algorithm name onto a member of this family.
    pub fn select(&self, name: &Atom) -> Result<Algorithm, ErrorKind> {
        self.algorithms
            .iter()
            .copied()
            .find(|alg| alg.as_str() == name.as_str())
            .ok_or_else(|| ErrorKind::Domain {
                domain: TYPE_OPTION,
                culprit: Term::Atom(name.clone()),
                permitted: self.permitted_names(),
            })
    }

    /// Resolve options, decode the material, and ask the provider.
    ///
    /// `Ok(false)` is a signature that does not verify; errors carry the stage that failed.
    pub fn verify(
        &self,
        request: &VerifyRequest,
        provider: &dyn SignatureProvider,
        codec: &TermCodec,
        env: &Env,
    ) -> Result<bool, LogicError> {
        let fail = |stage: Stage| move |kind: ErrorKind| LogicError::new(self.functor, stage, kind);

        let default = Term::atom(self.default.as_str());
        let algorithm = get_option_or_default(TYPE_OPTION, &request.options, default, env)
            .and_then(|term| resolve_to_atom(&term, env))
            .and_then(|name| self.select(&name))
            .map_err(fail(Stage::Options))?;

        let key = codec
            .decode(&request.key, self.key_encoding, env)
            .map_err(fail(Stage::PublicKey))?;
        let data = codec
            .term_to_bytes(&request.data, &request.options, env)
            .map_err(fail(Stage::Data))?;
        let signature = codec
            .decode(&request.signature, self.signature_encoding, env)
            .map_err(fail(Stage::Signature))?;

        tracing::debug!(
            predicate = self.functor,
            %algorithm,
            key_len = key.len(),
            data_len = data.len(),
            signature_len = signature.len(),
            "verifying signature"
        );

        let verified = provider
            .verify_signature(algorithm, &key, &data, &signature)
            .map_err(|e| {
                tracing::warn!("{}: provider rejected inputs: {}", self.functor, e);
                LogicError::new(self.functor, Stage::Verify, e)
            })?;

        tracing::debug!(predicate = self.functor, verified, "signature checked");
        Ok(verified)
    }
}
