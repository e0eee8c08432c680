use crate::term::Term;
use std::fmt;
use thiserror::Error;

/// The kind of term an operation expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidType {
    Atom,
    Integer,
    Byte,
    Compound,
    List,
}

impl fmt::Display for ValidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidType::Atom => "atom",
            ValidType::Integer => "integer",
            ValidType::Byte => "byte",
            ValidType::Compound => "compound",
            ValidType::List => "list",
        };
        f.write_str(name)
    }
}

/// Errors raised while walking terms under a binding environment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TermError {
    #[error("instantiation error: {0} is not sufficiently instantiated")]
    Instantiation(Term),

    #[error("type error: expected {expected}, found {culprit}")]
    Type { expected: ValidType, culprit: Term },

    #[error("list exceeds {limit} elements")]
    LimitExceeded { limit: usize },
}
