//! Termcrypt Types - Logic term model shared by the termcrypt crates.
//!
//! This crate provides:
//! - Terms (atoms, integers, variables, compounds and list cells)
//! - Binding environments with resolution and unification
//! - Proper-list iteration under a binding environment

pub mod term;
pub mod env;
pub mod list;
pub mod error;

pub use term::{Atom, Compound, Term, Variable, CONS_FUNCTOR, NIL};
pub use env::Env;
pub use list::{ListIter, DEFAULT_LIST_LIMIT};
pub use error::{TermError, ValidType};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Atom, Compound, Env, Term, TermError, ValidType, Variable};
}
