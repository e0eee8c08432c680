use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Text of the empty-list atom.
pub const NIL: &str = "[]";

/// Functor of a list cell.
pub const CONS_FUNCTOR: &str = ".";

static NEXT_VARIABLE: AtomicU64 = AtomicU64::new(1);

/// Interned textual constant.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom(Arc<str>);

impl Atom {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The empty list `[]`
    pub fn nil() -> Self {
        Self::new(NIL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        &*self.0 == NIL
    }

    /// Build the compound `self(args...)`.
    pub fn apply(&self, args: impl IntoIterator<Item = Term>) -> Term {
        Term::Compound(Compound::new(self.clone(), args))
    }

    /// Whether the atom prints without quotes.
    fn is_plain(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => self.is_nil(),
        }
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain() {
            return f.write_str(&self.0);
        }
        f.write_str("'")?;
        for c in self.0.chars() {
            match c {
                '\'' => f.write_str("\\'")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("'")
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self)
    }
}

/// Logic variable. Identity is the numeric id; bindings live in an [`Env`](crate::Env).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(u64);

impl Variable {
    /// Allocate a variable distinct from every other variable in the process.
    pub fn fresh() -> Self {
        Self(NEXT_VARIABLE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_G{}", self.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.0)
    }
}

/// Functor applied to one or more arguments.
///
/// Equality and drop walk the term with an explicit stack, so a list of any
/// length can be compared and freed without exhausting the call stack.
#[derive(Clone, Eq)]
pub struct Compound {
    functor: Atom,
    args: Arc<[Term]>,
}

impl Compound {
    pub fn new(functor: Atom, args: impl IntoIterator<Item = Term>) -> Self {
        Self {
            functor,
            args: args.into_iter().collect(),
        }
    }

    pub fn functor(&self) -> &Atom {
        &self.functor
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn arg(&self, index: usize) -> Option<&Term> {
        self.args.get(index)
    }

    /// Whether this is a list cell `'.'(Head, Tail)`.
    pub fn is_cons(&self) -> bool {
        self.arity() == 2 && self.functor.as_str() == CONS_FUNCTOR
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.functor == other.functor
            && self.arity() == other.arity()
            && self.args.iter().zip(other.args.iter()).all(|(a, b)| a == b)
    }
}

impl Drop for Compound {
    fn drop(&mut self) {
        if self.args.is_empty() {
            return;
        }
        // Detach the arguments of every uniquely owned descendant before it is
        // dropped, leaving each one holding the shared empty slice.
        let empty: Arc<[Term]> = Arc::from(Vec::new());
        let mut pending = vec![std::mem::replace(&mut self.args, empty.clone())];
        while let Some(mut args) = pending.pop() {
            let Some(slots) = Arc::get_mut(&mut args) else {
                continue;
            };
            for slot in slots.iter_mut() {
                if let Term::Compound(child) = slot {
                    if !child.args.is_empty() {
                        pending.push(std::mem::replace(&mut child.args, empty.clone()));
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Compound({})", self)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cons() {
            return fmt_list(self, f);
        }
        write!(f, "{}(", self.functor)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

fn fmt_list(cell: &Compound, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}", cell.args[0])?;
    let mut tail = &cell.args[1];
    loop {
        match tail {
            Term::Compound(next) if next.is_cons() => {
                write!(f, ",{}", next.args[0])?;
                tail = &next.args[1];
            }
            Term::Atom(a) if a.is_nil() => break,
            other => {
                write!(f, "|{}", other)?;
                break;
            }
        }
    }
    f.write_str("]")
}

/// A logic term.
#[derive(Clone, Eq)]
pub enum Term {
    Variable(Variable),
    Atom(Atom),
    Integer(i64),
    Compound(Compound),
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Term::Variable(x), Term::Variable(y)) if x == y => {}
                (Term::Atom(x), Term::Atom(y)) if x == y => {}
                (Term::Integer(x), Term::Integer(y)) if x == y => {}
                (Term::Compound(x), Term::Compound(y)) => {
                    if x.functor != y.functor || x.arity() != y.arity() {
                        return false;
                    }
                    if !Arc::ptr_eq(&x.args, &y.args) {
                        pending.extend(x.args.iter().zip(y.args.iter()));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Term {
    pub fn atom(name: impl AsRef<str>) -> Self {
        Term::Atom(Atom::new(name))
    }

    pub fn integer(value: i64) -> Self {
        Term::Integer(value)
    }

    /// A term holding a freshly allocated variable.
    pub fn var() -> Self {
        Term::Variable(Variable::fresh())
    }

    pub fn compound(functor: impl AsRef<str>, args: impl IntoIterator<Item = Term>) -> Self {
        Atom::new(functor).apply(args)
    }

    pub fn nil() -> Self {
        Term::Atom(Atom::nil())
    }

    pub fn cons(head: Term, tail: Term) -> Self {
        Term::Compound(Compound::new(Atom::new(CONS_FUNCTOR), [head, tail]))
    }

    /// Build a proper list from the given elements.
    pub fn list(elements: impl IntoIterator<Item = Term>) -> Self {
        Self::partial_list(elements, Term::nil())
    }

    /// Build a list whose last tail is `tail` (a partial list when `tail` is a variable).
    pub fn partial_list(elements: impl IntoIterator<Item = Term>, tail: Term) -> Self {
        let elements: Vec<Term> = elements.into_iter().collect();
        elements
            .into_iter()
            .rev()
            .fold(tail, |acc, head| Term::cons(head, acc))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Whether the term is `[]` or a list cell, without looking further down the tail.
    pub fn is_list_like(&self) -> bool {
        match self {
            Term::Atom(a) => a.is_nil(),
            Term::Compound(c) => c.is_cons(),
            _ => false,
        }
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl From<Compound> for Term {
    fn from(compound: Compound) -> Self {
        Term::Compound(compound)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Integer(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Atom(a) => write!(f, "{}", a),
            Term::Integer(i) => write!(f, "{}", i),
            Term::Compound(c) => write!(f, "{}", c),
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self)
    }
}
