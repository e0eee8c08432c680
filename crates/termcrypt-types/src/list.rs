use crate::env::Env;
use crate::error::{TermError, ValidType};
use crate::term::Term;

/// Default upper bound on the number of cells a [`ListIter`] will walk.
pub const DEFAULT_LIST_LIMIT: usize = 1 << 20;

/// Iterator over the elements of a list term.
///
/// Yields each element resolved under the environment. An unbound or non-list
/// tail ends iteration with an error naming that tail, as does walking past the
/// limit. After an error the iterator is exhausted.
pub struct ListIter<'a> {
    env: &'a Env,
    cursor: Option<Term>,
    visited: usize,
    limit: usize,
}

impl<'a> ListIter<'a> {
    pub fn new(env: &'a Env, list: Term, limit: usize) -> Self {
        Self {
            env,
            cursor: Some(list),
            visited: 0,
            limit,
        }
    }

    /// Same list, different limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Iterator for ListIter<'_> {
    type Item = Result<Term, TermError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        match self.env.resolve(&cursor) {
            Term::Atom(a) if a.is_nil() => None,
            Term::Compound(cell) if cell.is_cons() => {
                if self.visited >= self.limit {
                    return Some(Err(TermError::LimitExceeded { limit: self.limit }));
                }
                self.visited += 1;
                self.cursor = Some(cell.args()[1].clone());
                Some(Ok(self.env.resolve(&cell.args()[0])))
            }
            unbound @ Term::Variable(_) => Some(Err(TermError::Instantiation(unbound))),
            tail => Some(Err(TermError::Type {
                expected: ValidType::List,
                culprit: tail,
            })),
        }
    }
}
