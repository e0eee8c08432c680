//! Deferred evaluation contract between predicates and the host.
//!
//! A predicate call returns a [`Promise`] immediately. The host decides when to
//! force it; only then does decoding and the provider call happen. On success a
//! predicate hands the (possibly extended) bindings to its continuation.

use crate::error::{EngineError, LogicError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use termcrypt_types::{Env, Term};

/// Success continuation: receives the bindings produced by the predicate.
pub type Cont = Box<dyn FnOnce(Env) -> Promise + Send>;

type Thunk = Box<dyn FnOnce(&Context) -> Promise + Send>;

/// Outcome of a predicate, possibly not yet computed.
pub enum Promise {
    /// Work handed back to the host; nothing has run yet.
    Delayed(Thunk),
    /// `true` once a continuation accepted a solution, `false` on logic failure.
    Bool(bool),
    Error(LogicError),
}

impl Promise {
    pub fn delay(thunk: impl FnOnce(&Context) -> Promise + Send + 'static) -> Self {
        Promise::Delayed(Box::new(thunk))
    }

    pub fn error(err: LogicError) -> Self {
        Promise::Error(err)
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, Promise::Delayed(_))
    }

    /// Run delayed work until a final outcome is reached.
    ///
    /// The context is checked before each delayed unit starts; a unit that has
    /// started always runs to completion.
    pub fn force(self, ctx: &Context) -> Result<bool, EngineError> {
        let mut promise = self;
        loop {
            match promise {
                Promise::Delayed(thunk) => {
                    ctx.check()?;
                    promise = thunk(ctx);
                }
                Promise::Bool(solved) => return Ok(solved),
                Promise::Error(err) => return Err(err.into()),
            }
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Promise::Delayed(_) => f.write_str("Promise::Delayed"),
            Promise::Bool(b) => write!(f, "Promise::Bool({})", b),
            Promise::Error(e) => write!(f, "Promise::Error({})", e),
        }
    }
}

/// Unify `a` with `b` and continue, or fail without calling `cont`.
pub fn unify(a: &Term, b: &Term, cont: Cont, env: &Env) -> Promise {
    match env.unify(a, b) {
        Some(extended) => cont(extended),
        None => Promise::Bool(false),
    }
}

/// Cancellation and deadline shared between the host and running goals.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Request cancellation. Clones of this context observe it too.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(EngineError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Run `goal` against `env` and return the bindings of its first solution.
///
/// `Ok(None)` is a logic failure.
pub fn solve(
    goal: impl FnOnce(Cont, &Env) -> Promise,
    env: &Env,
    ctx: &Context,
) -> Result<Option<Env>, EngineError> {
    let slot: Arc<Mutex<Option<Env>>> = Arc::new(Mutex::new(None));
    let sink = slot.clone();
    let cont: Cont = Box::new(move |solution| {
        *sink.lock() = Some(solution);
        Promise::Bool(true)
    });

    let solved = goal(cont, env).force(ctx)?;
    let solution = slot.lock().take();
    Ok(if solved { solution } else { None })
}
