//! Option list lookup.
//!
//! Options are written as a list of unary compounds, e.g.
//! `[encoding(octet), type(secp256k1)]`. The first entry with a matching
//! functor wins.

use crate::error::ErrorKind;
use termcrypt_types::{Atom, Env, Term, ValidType};

/// Value of option `key` in `options`, or `default` when absent.
///
/// Entries whose functor differs from `key` are skipped. An entry that is not a
/// compound, or a `key` entry whose arity is not 1, is rejected.
pub fn get_option_or_default(
    key: &str,
    options: &Term,
    default: Term,
    env: &Env,
) -> Result<Term, ErrorKind> {
    for item in env.list_iter(options) {
        match item? {
            Term::Compound(option) if option.functor().as_str() == key => {
                if option.arity() != 1 {
                    return Err(ErrorKind::Domain {
                        domain: "option",
                        culprit: Term::Compound(option),
                        permitted: Vec::new(),
                    });
                }
                let value = option.args()[0].clone();
                tracing::trace!(option = key, value = %value, "option resolved");
                return Ok(value);
            }
            Term::Compound(_) => continue,
            unbound @ Term::Variable(_) => return Err(ErrorKind::Instantiation(unbound)),
            other => {
                return Err(ErrorKind::Type {
                    expected: ValidType::Compound,
                    culprit: other,
                })
            }
        }
    }

    tracing::trace!(option = key, value = %default, "option defaulted");
    Ok(default)
}

/// Resolve `term` and require an atom.
pub fn resolve_to_atom(term: &Term, env: &Env) -> Result<Atom, ErrorKind> {
    match env.resolve(term) {
        Term::Atom(atom) => Ok(atom),
        other => Err(ErrorKind::Type {
            expected: ValidType::Atom,
            culprit: other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcrypt_types::Variable;

    fn opt(key: &str, value: &str) -> Term {
        Term::compound(key, [Term::atom(value)])
    }

    #[test]
    fn test_first_match_wins() {
        let options = Term::list([
            opt("encoding", "octet"),
            opt("type", "secp256k1"),
            opt("type", "secp256r1"),
        ]);
        let value = get_option_or_default("type", &options, Term::atom("x"), &Env::new()).unwrap();
        assert_eq!(value, Term::atom("secp256k1"));
    }

    #[test]
    fn test_default_when_missing() {
        let options = Term::list([opt("encoding", "octet")]);
        let value =
            get_option_or_default("type", &options, Term::atom("ed25519"), &Env::new()).unwrap();
        assert_eq!(value, Term::atom("ed25519"));

        let value =
            get_option_or_default("type", &Term::nil(), Term::atom("ed25519"), &Env::new()).unwrap();
        assert_eq!(value, Term::atom("ed25519"));
    }

    #[test]
    fn test_other_arity_entries_are_skipped() {
        let options = Term::list([
            Term::compound("weight", [Term::integer(1), Term::integer(2)]),
            opt("type", "ed25519"),
        ]);
        let value = get_option_or_default("type", &options, Term::nil(), &Env::new()).unwrap();
        assert_eq!(value, Term::atom("ed25519"));
    }

    #[test]
    fn test_matching_key_with_wrong_arity() {
        let options = Term::list([Term::compound("type", [Term::atom("a"), Term::atom("b")])]);
        let err = get_option_or_default("type", &options, Term::nil(), &Env::new()).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_options_must_be_a_list() {
        let err = get_option_or_default("type", &opt("type", "ed25519"), Term::nil(), &Env::new())
            .unwrap_err();
        assert!(err.is_type());

        let err = get_option_or_default("type", &Term::var(), Term::nil(), &Env::new()).unwrap_err();
        assert!(err.is_instantiation());
    }

    #[test]
    fn test_non_compound_entry() {
        let options = Term::list([Term::atom("hex")]);
        let err = get_option_or_default("encoding", &options, Term::nil(), &Env::new()).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::Type {
                expected: ValidType::Compound,
                culprit: Term::atom("hex"),
            }
        );
    }

    #[test]
    fn test_entries_resolved_through_bindings() {
        let v = Variable::fresh();
        let env = Env::new().unify(&Term::Variable(v), &opt("encoding", "octet")).unwrap();
        let options = Term::list([Term::Variable(v)]);
        let value = get_option_or_default("encoding", &options, Term::nil(), &env).unwrap();
        assert_eq!(value, Term::atom("octet"));
    }

    #[test]
    fn test_lookup_does_not_mutate() {
        let options = Term::list([opt("encoding", "octet")]);
        let before = options.clone();
        let _ = get_option_or_default("encoding", &options, Term::nil(), &Env::new());
        assert_eq!(options, before);
    }

    #[test]
    fn test_resolve_to_atom() {
        let v = Variable::fresh();
        let env = Env::new().unify(&Term::Variable(v), &Term::atom("octet")).unwrap();
        assert_eq!(resolve_to_atom(&Term::Variable(v), &env), Ok(Atom::new("octet")));

        assert!(resolve_to_atom(&Term::integer(1), &env).unwrap_err().is_type());
        assert!(resolve_to_atom(&Term::var(), &env).unwrap_err().is_type());
    }
}
