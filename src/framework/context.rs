//! # Call Context
//!
//! A [`CallContext`] is the envelope of one RPC invocation. It names the method
//! and interaction shape, carries the caller's absolute deadline and owns the
//! cancellation signal shared by every task taking part in the call.
//!
//! ## Propagation
//!
//! The caller builds the context from [`CallOptions`] before the call message is
//! sent. The very same value (cloned) travels with the message to the server,
//! so both ends observe one deadline and one cancellation token. Nothing is
//! ambient: every operation on the call path receives the context explicitly
//! and races its suspension points against [`CallContext::done`].
//!
//! ## Terminal outcomes
//!
//! - deadline passed: [`Code::DeadlineExceeded`](crate::framework::Code::DeadlineExceeded)
//! - token cancelled (and deadline not passed): [`Code::Cancelled`](crate::framework::Code::Cancelled)
//!
//! The deadline wins when both hold, so a client that cancels its token because
//! its own timer fired is still reported as a deadline expiry on the server.

use crate::framework::status::Status;
use std::fmt;
use std::future::Future;
use tokio::time::{Duration, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

/// The four interaction shapes a call can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    Unary,
    ServerStreaming,
    ClientStreaming,
    BidiStreaming,
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallShape::Unary => "unary",
            CallShape::ServerStreaming => "server_streaming",
            CallShape::ClientStreaming => "client_streaming",
            CallShape::BidiStreaming => "bidi_streaming",
        };
        f.write_str(name)
    }
}

/// Per-call options chosen by the caller.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline to `timeout` from now. A timeout too large to be
    /// represented as an instant leaves the call without a deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Ties the call to a caller-owned token: cancelling `token` cancels the call.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Envelope of one RPC invocation, shared by caller and callee.
#[derive(Debug, Clone)]
pub struct CallContext {
    method: &'static str,
    shape: CallShape,
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl CallContext {
    pub fn new(method: &'static str, shape: CallShape, options: &CallOptions) -> Self {
        // A child token lets the caller cancel many calls at once without a
        // single call's teardown cancelling the caller's token.
        let token = match &options.cancellation {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        Self {
            method,
            shape,
            deadline: options.deadline,
            token,
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn shape(&self) -> CallShape {
        self.shape
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when the call has no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Cancels the call. Idempotent; a cancelled call is never un-cancelled.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns the terminal status if the call can no longer make progress.
    pub fn check(&self) -> Result<(), Status> {
        if self.is_expired() {
            return Err(Status::deadline_exceeded(format!(
                "deadline exceeded for {}",
                self.method
            )));
        }
        if self.is_cancelled() {
            return Err(Status::cancelled(format!("{} was cancelled", self.method)));
        }
        Ok(())
    }

    /// Resolves once the call is cancelled or its deadline passes, yielding the
    /// matching terminal status. Pending forever for a live call without deadline.
    pub async fn done(&self) -> Status {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => {}
                    _ = self.token.cancelled() => {}
                }
            }
            None => self.token.cancelled().await,
        }
        match self.check() {
            Err(status) => status,
            Ok(()) => Status::cancelled(format!("{} was cancelled", self.method)),
        }
    }

    /// Drives `fut` unless the call ends first.
    ///
    /// Returns the terminal status instead of the output when the deadline
    /// passes or the call is cancelled; `fut` is dropped at that point.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Status> {
        self.check()?;
        tokio::select! {
            biased;
            status = self.done() => Err(status),
            output = fut => Ok(output),
        }
    }

    /// Derives a context whose deadline is at most `timeout` from now.
    ///
    /// The derived context is cancelled with its parent, never the other way round.
    /// A timeout too large to be represented keeps the parent's deadline.
    pub fn with_timeout(&self, timeout: Duration) -> CallContext {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(deadline), Some(bound)) => Some(deadline.min(bound)),
            (deadline, None) => deadline,
            (None, bound) => bound,
        };
        Self {
            method: self.method,
            shape: self.shape,
            deadline,
            token: self.token.child_token(),
        }
    }

    /// Guard that cancels the call when dropped; held by the calling side so an
    /// abandoned call is observed by the server.
    pub(crate) fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Code;

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_deadline_exceeded() {
        let options = CallOptions::new().with_timeout(Duration::from_millis(50));
        let ctx = CallContext::new("Test", CallShape::Unary, &options);

        let result = ctx.run(tokio::time::sleep(Duration::from_secs(1))).await;

        assert_eq!(result.unwrap_err().code(), Code::DeadlineExceeded);
        assert!(ctx.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_cancelled() {
        let ctx = CallContext::new("Test", CallShape::Unary, &CallOptions::new());
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = ctx.run(std::future::pending::<()>()).await;

        assert_eq!(result.unwrap_err().code(), Code::Cancelled);
    }

    #[tokio::test]
    async fn test_parent_token_cancels_call() {
        let parent = CancellationToken::new();
        let options = CallOptions::new().with_cancellation(parent.clone());
        let ctx = CallContext::new("Test", CallShape::Unary, &options);

        parent.cancel();

        assert_eq!(ctx.check().unwrap_err().code(), Code::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_narrows_but_never_extends() {
        let options = CallOptions::new().with_timeout(Duration::from_secs(1));
        let ctx = CallContext::new("Test", CallShape::ServerStreaming, &options);

        let narrowed = ctx.with_timeout(Duration::from_millis(100));
        let widened = ctx.with_timeout(Duration::from_secs(10));

        assert!(narrowed.deadline() < ctx.deadline());
        assert_eq!(widened.deadline(), ctx.deadline());

        narrowed.cancel();
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_unrepresentable_timeouts_do_not_set_a_deadline() {
        let options = CallOptions::new().with_timeout(Duration::MAX);
        assert_eq!(options.deadline(), None);

        let ctx = CallContext::new("Test", CallShape::ServerStreaming, &options);
        let derived = ctx.with_timeout(Duration::MAX);
        assert_eq!(derived.deadline(), None);
        assert!(derived.check().is_ok());

        let bounded = CallContext::new(
            "Test",
            CallShape::ServerStreaming,
            &CallOptions::new().with_timeout(Duration::from_secs(1)),
        );
        assert_eq!(bounded.with_timeout(Duration::MAX).deadline(), bounded.deadline());
    }
}
