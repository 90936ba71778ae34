//! Deadlines and cancellation for a chain of GraphQL calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared flag that aborts all remaining calls of a lookup once set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Calls already in flight run to completion.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Deadline and cancellation token threaded through every network call.
///
/// The default context has no deadline and is never cancelled.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives the whole call chain `budget` from now.
    pub fn with_timeout(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time left until the deadline.
    ///
    /// `None` means unbounded, `Some(Duration::ZERO)` means expired.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_unbounded() {
        let ctx = CallContext::new();
        assert_eq!(ctx.remaining(), None);
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = CallContext::new().with_deadline(Instant::now());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_cancel_is_shared() {
        let token = CancelToken::new();
        let ctx = CallContext::new().with_cancel_token(token.clone());
        let copy = ctx.clone();

        token.cancel();
        assert!(ctx.is_cancelled());
        assert!(copy.is_cancelled());
    }
}
