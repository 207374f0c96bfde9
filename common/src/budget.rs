//! Deadline budgets for the quote pipeline.
//!
//! A [`Budget`] is an absolute deadline attached to a unit of work. Budgets
//! are derived, never chosen independently: a child derived from a parent is
//! clamped so it cannot outlive the parent. Blocking calls run under
//! [`Budget::enforce`], which aborts the in-flight future at the deadline
//! and surfaces [`QuoteError::DeadlineExceeded`] instead of a generic I/O
//! failure.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{QuoteError, Result};

/// Budget policy constants.
pub mod constants {
    use super::Duration;

    /// Budget for handling one inbound quote request (200 milliseconds).
    /// The upstream fetch shares this budget; it has no independent slice.
    pub fn inbound_request_budget() -> Duration {
        Duration::from_millis(200)
    }

    /// Budget for one persistence write (10 milliseconds). Derived fresh at
    /// persist time from the inbound request's root, not from the fetch's
    /// remaining time.
    pub fn persist_budget() -> Duration {
        Duration::from_millis(10)
    }

    /// Requester budget for the entire round trip to the quote service
    /// (300 milliseconds).
    pub fn round_trip_budget() -> Duration {
        Duration::from_millis(300)
    }
}

/// An absolute deadline attached to a chain of dependent operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    deadline: Instant,
}

impl Budget {
    /// Create a top-level budget expiring `duration` from now.
    pub fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + duration,
        }
    }

    /// Derive a child budget. The child's deadline is `duration` from now,
    /// clamped to this budget's deadline: a sub-call never outlives its
    /// caller.
    pub fn derive(&self, duration: Duration) -> Self {
        Self {
            deadline: (Instant::now() + duration).min(self.deadline),
        }
    }

    /// The absolute deadline.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Check whether the deadline has passed.
    pub fn is_exhausted(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Run `fut` under this budget. If the deadline passes first, the
    /// future is dropped and the call fails with
    /// [`QuoteError::DeadlineExceeded`] naming `operation`.
    pub async fn enforce<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(QuoteError::DeadlineExceeded(operation.to_string())),
        }
    }
}
