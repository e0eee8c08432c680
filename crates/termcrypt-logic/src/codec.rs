//! Conversion between byte sequences and their term encodings.
//!
//! Two encodings exist: `hex`, an atom of hexadecimal digits, and `octet`, a
//! proper list of integers in `0..=255`.

use crate::error::ErrorKind;
use crate::options::{get_option_or_default, resolve_to_atom};
use std::fmt;
use termcrypt_types::{Atom, Env, Term, ValidType};

/// Name of the option selecting the data encoding.
pub const ENCODING_OPTION: &str = "encoding";

/// Default upper bound on decoded byte length (1 MiB).
pub const DEFAULT_MAX_BYTES: usize = 1 << 20;

/// Term encoding of a byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Hex,
    Octet,
}

impl Encoding {
    pub const ALL: [Encoding; 2] = [Encoding::Hex, Encoding::Octet];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Octet => "octet",
        }
    }

    pub fn to_term(self) -> Term {
        Term::atom(self.as_str())
    }

    pub fn from_atom(atom: &Atom) -> Result<Self, ErrorKind> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == atom.as_str())
            .ok_or_else(|| ErrorKind::Domain {
                domain: ENCODING_OPTION,
                culprit: Term::Atom(atom.clone()),
                permitted: Self::ALL.iter().map(Encoding::as_str).collect(),
            })
    }

    /// Read `encoding(E)` from an option list, defaulting to `hex`.
    pub fn from_options(options: &Term, env: &Env) -> Result<Self, ErrorKind> {
        let term = get_option_or_default(ENCODING_OPTION, options, Encoding::Hex.to_term(), env)?;
        Self::from_atom(&resolve_to_atom(&term, env)?)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proper list of byte values, in order.
pub fn bytes_to_list(bytes: &[u8]) -> Term {
    Term::list(bytes.iter().map(|&b| Term::Integer(i64::from(b))))
}

/// Atom holding the lowercase hexadecimal encoding of `bytes`.
pub fn bytes_to_hex_atom(bytes: &[u8]) -> Term {
    Term::atom(hex::encode(bytes))
}

/// Decoder for byte-bearing terms, bounded by a maximum byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermCodec {
    max_bytes: usize,
}

impl Default for TermCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BYTES)
    }
}

impl TermCodec {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Convert a proper list of integers in `0..=255` into bytes.
    pub fn list_to_bytes(&self, term: &Term, env: &Env) -> Result<Vec<u8>, ErrorKind> {
        env.list_iter(term)
            .with_limit(self.max_bytes)
            .map(|item| {
                match item? {
                    Term::Integer(value) => u8::try_from(value).map_err(|_| ErrorKind::Type {
                        expected: ValidType::Byte,
                        culprit: Term::Integer(value),
                    }),
                    unbound @ Term::Variable(_) => Err(ErrorKind::Instantiation(unbound)),
                    other => Err(ErrorKind::Type {
                        expected: ValidType::Byte,
                        culprit: other,
                    }),
                }
            })
            .collect()
    }

    /// Decode the text of a hex atom. Either digit case is accepted.
    pub fn decode_hex(&self, atom: &Atom) -> Result<Vec<u8>, ErrorKind> {
        let text = atom.as_str();
        if text.len() / 2 > self.max_bytes {
            return Err(ErrorKind::Resource {
                resource: "byte length",
                limit: self.max_bytes,
            });
        }
        hex::decode(text)
            .map_err(|e| ErrorKind::Syntax(format!("invalid hexadecimal {}: {}", atom, e)))
    }

    /// Decode `term` under a fixed encoding.
    pub fn decode(&self, term: &Term, encoding: Encoding, env: &Env) -> Result<Vec<u8>, ErrorKind> {
        match (encoding, env.resolve(term)) {
            (Encoding::Hex, Term::Atom(atom)) => self.decode_hex(&atom),
            (Encoding::Hex, other) => Err(ErrorKind::Type {
                expected: ValidType::Atom,
                culprit: other,
            }),
            (Encoding::Octet, list) if list.is_list_like() => self.list_to_bytes(&list, env),
            (Encoding::Octet, other) => Err(ErrorKind::Type {
                expected: ValidType::List,
                culprit: other,
            }),
        }
    }

    /// Decode `term` under the `encoding` named in `options` (default `hex`).
    pub fn term_to_bytes(&self, term: &Term, options: &Term, env: &Env) -> Result<Vec<u8>, ErrorKind> {
        let encoding = Encoding::from_options(options, env)?;
        self.decode(term, encoding, env)
    }
}
