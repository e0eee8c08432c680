use std::fmt;
use termcrypt_crypto::CryptoError;
use termcrypt_types::{Term, TermError, ValidType};
use thiserror::Error;

/// What went wrong, independent of which predicate was running.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("instantiation error: {0} is not sufficiently instantiated")]
    Instantiation(Term),

    #[error("type error: expected {expected}, found {culprit}")]
    Type { expected: ValidType, culprit: Term },

    #[error("domain error: invalid {domain} {culprit}{}", possible_values(.permitted))]
    Domain {
        domain: &'static str,
        culprit: Term,
        permitted: Vec<&'static str>,
    },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("resource error: {resource} exceeds {limit}")]
    Resource { resource: &'static str, limit: usize },

    #[error("provider error: {0}")]
    Provider(#[from] CryptoError),
}

fn possible_values(permitted: &[&'static str]) -> String {
    if permitted.is_empty() {
        String::new()
    } else {
        format!(". Possible values: {}", permitted.join(", "))
    }
}

impl ErrorKind {
    pub fn is_instantiation(&self) -> bool {
        matches!(self, ErrorKind::Instantiation(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, ErrorKind::Type { .. })
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, ErrorKind::Domain { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ErrorKind::Syntax(_))
    }
}

impl From<TermError> for ErrorKind {
    fn from(e: TermError) -> Self {
        match e {
            TermError::Instantiation(culprit) => ErrorKind::Instantiation(culprit),
            TermError::Type { expected, culprit } => ErrorKind::Type { expected, culprit },
            TermError::LimitExceeded { limit } => ErrorKind::Resource {
                resource: "list length",
                limit,
            },
        }
    }
}

/// Step of a predicate at which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Arguments,
    Options,
    PublicKey,
    Data,
    Signature,
    Verify,
    Hex,
    Bytes,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Arguments => "invalid arguments",
            Stage::Options => "failed to resolve options",
            Stage::PublicKey => "failed to decode public key",
            Stage::Data => "failed to decode data",
            Stage::Signature => "failed to decode signature",
            Stage::Verify => "failed to verify signature",
            Stage::Hex => "failed to decode hexadecimal",
            Stage::Bytes => "failed to convert list into bytes",
        };
        f.write_str(text)
    }
}

/// Structured failure of a predicate call.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{predicate}: {stage}: {kind}")]
pub struct LogicError {
    /// Predicate indicator, e.g. `eddsa_verify/4`.
    pub predicate: &'static str,
    pub stage: Stage,
    #[source]
    pub kind: ErrorKind,
}

impl LogicError {
    pub fn new(predicate: &'static str, stage: Stage, kind: impl Into<ErrorKind>) -> Self {
        Self {
            predicate,
            stage,
            kind: kind.into(),
        }
    }
}

/// Errors surfaced by the host solve loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation deadline exceeded")]
    DeadlineExceeded,
}
