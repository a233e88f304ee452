// Scan Context
//
// A context carries a cancellation signal and an optional deadline to the
// visit callback of a streaming scan. The engine only passes it along; the
// callback decides whether to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Reason a context is done
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline signal passed to streaming visitors
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Cancellation flags of this context and all its ancestors
    flags: Vec<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

/// Cancels the context it was created with, and every context derived from it
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a cancellable child context
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let mut child = self.clone();
        child.flags.push(Arc::clone(&flag));
        (child, CancelHandle { flag })
    }

    /// Derive a child context that expires at `deadline`, or at the parent's
    /// deadline if that is earlier
    pub fn with_deadline(&self, deadline: Instant) -> Context {
        let mut child = self.clone();
        child.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        child
    }

    pub fn with_timeout(&self, timeout: Duration) -> Context {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.iter().any(|flag| flag.load(Ordering::SeqCst))
    }

    /// Why the context is done, or `None` while it is live
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }
}
