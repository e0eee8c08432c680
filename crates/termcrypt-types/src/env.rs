//! Variable bindings.
//!
//! An [`Env`] is an immutable snapshot: binding or unifying produces a new
//! environment and leaves the original untouched, so a caller that needs to
//! undo work simply keeps the older snapshot.

use crate::list::{ListIter, DEFAULT_LIST_LIMIT};
use crate::term::{Atom, Term, Variable};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable set of variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Env {
    bindings: Arc<HashMap<Variable, Term>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Direct binding of `var`, if any.
    pub fn lookup(&self, var: &Variable) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Follow variable bindings until reaching an unbound variable or a non-variable term.
    ///
    /// Only the outermost term is resolved; arguments of compounds are left as-is.
    pub fn resolve(&self, term: &Term) -> Term {
        let mut current = term;
        while let Term::Variable(var) = current {
            match self.bindings.get(var) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current.clone()
    }

    /// Fully substitute every bound variable inside `term`.
    pub fn simplify(&self, term: &Term) -> Term {
        enum Frame {
            Visit(Term),
            Build(Atom, usize),
        }

        let mut work = vec![Frame::Visit(term.clone())];
        let mut done: Vec<Term> = Vec::new();
        while let Some(frame) = work.pop() {
            match frame {
                Frame::Visit(t) => match self.resolve(&t) {
                    Term::Compound(c) => {
                        work.push(Frame::Build(c.functor().clone(), c.arity()));
                        work.extend(c.args().iter().rev().cloned().map(Frame::Visit));
                    }
                    other => done.push(other),
                },
                Frame::Build(functor, arity) => {
                    let args = done.split_off(done.len() - arity);
                    done.push(functor.apply(args));
                }
            }
        }
        done.pop().unwrap_or_else(|| term.clone())
    }

    /// Return a new environment with `var` bound to `value`.
    ///
    /// The caller guarantees `var` is unbound and does not occur in `value`;
    /// outside this crate bindings are made through [`Env::unify`].
    pub(crate) fn bind(&self, var: Variable, value: Term) -> Env {
        let mut bindings = self.bindings.clone();
        Arc::make_mut(&mut bindings).insert(var, value);
        Env { bindings }
    }

    /// Unify two terms, returning the extended environment on success.
    ///
    /// Performs the occurs check, so a successful unification never creates a cyclic term.
    pub fn unify(&self, a: &Term, b: &Term) -> Option<Env> {
        let mut env = self.clone();
        let mut pending = vec![(a.clone(), b.clone())];

        while let Some((x, y)) = pending.pop() {
            let x = env.resolve(&x);
            let y = env.resolve(&y);
            match (&x, &y) {
                (Term::Variable(vx), Term::Variable(vy)) if vx == vy => {}
                (Term::Variable(v), other) | (other, Term::Variable(v)) => {
                    if env.occurs(v, other) {
                        return None;
                    }
                    env = env.bind(*v, other.clone());
                }
                (Term::Atom(ax), Term::Atom(ay)) => {
                    if ax != ay {
                        return None;
                    }
                }
                (Term::Integer(ix), Term::Integer(iy)) => {
                    if ix != iy {
                        return None;
                    }
                }
                (Term::Compound(cx), Term::Compound(cy)) => {
                    if cx.functor() != cy.functor() || cx.arity() != cy.arity() {
                        return None;
                    }
                    pending.extend(cx.args().iter().cloned().zip(cy.args().iter().cloned()));
                }
                _ => return None,
            }
        }

        Some(env)
    }

    /// Walk the list `term` under this environment with the default length limit.
    pub fn list_iter(&self, term: &Term) -> ListIter<'_> {
        ListIter::new(self, term.clone(), DEFAULT_LIST_LIMIT)
    }

    fn occurs(&self, var: &Variable, term: &Term) -> bool {
        let mut stack = vec![term.clone()];
        while let Some(t) = stack.pop() {
            match self.resolve(&t) {
                Term::Variable(v) if v == *var => return true,
                Term::Compound(c) => stack.extend(c.args().iter().cloned()),
                _ => {}
            }
        }
        false
    }
}
