//! Long-running operation polling.
//!
//! Video generation is asynchronous: the API returns an operation handle
//! that must be polled until it reaches a terminal state. The loop here is
//! shared by every video tool: sleep a fixed interval, check the operation,
//! repeat up to a fixed attempt budget (~10 minutes wall clock).
//!
//! Exhausting the budget is not an error; the caller reports it as a
//! `timeout` status on the tool result. A failing status check is retried on
//! the regular interval; after [`MAX_CONSECUTIVE_POLL_FAILURES`] failures in
//! a row the loop gives up with a distinct `poll_error` outcome rather than
//! leaving the operation state ambiguous.
//!
//! The loop holds no locks and suspends only at `sleep().await`, so dropping
//! the calling task cancels polling promptly. The remote job itself cannot
//! be cancelled; once submitted it runs to completion on the backend.

use gemini_mcp_common::error::Error;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed delay between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Maximum number of status checks before giving up (~10 minutes).
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Consecutive status-check failures tolerated before aborting the loop.
pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 3;

/// Snapshot of a long-running operation, as seen by the poll loop.
#[derive(Debug)]
pub struct OperationStatus<T> {
    /// Whether the operation has reached a terminal state
    pub done: bool,
    /// Error message attached to a failed operation
    pub error: Option<String>,
    /// Result payload of a successful operation
    pub result: Option<T>,
}

impl<T> OperationStatus<T> {
    /// Map a terminal snapshot to its outcome; `None` while still running.
    pub fn into_terminal_outcome(self) -> Option<PollOutcome<T>> {
        if !self.done {
            return None;
        }
        Some(match (self.error, self.result) {
            (Some(message), _) => PollOutcome::Failed(message),
            (None, Some(result)) => PollOutcome::Completed(result),
            (None, None) => PollOutcome::Failed("operation finished without a result".to_string()),
        })
    }
}

/// Terminal outcome of polling an operation.
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// The operation finished and produced a result
    Completed(T),
    /// The operation finished with an error, or finished empty-handed
    Failed(String),
    /// The attempt budget ran out while the operation was still running
    TimedOut,
    /// Status checks kept failing; the operation state is unknown
    PollError(String),
}

impl<T> PollOutcome<T> {
    /// Status label reported on tool results.
    pub fn status_label(&self) -> &'static str {
        match self {
            PollOutcome::Completed(_) => "completed",
            PollOutcome::Failed(_) => "failed",
            PollOutcome::TimedOut => "timeout",
            PollOutcome::PollError(_) => "poll_error",
        }
    }
}

/// Poll an operation until it terminates, times out, or becomes unreadable.
///
/// `fetch` is called once per attempt after the fixed interval has elapsed;
/// at most [`MAX_POLL_ATTEMPTS`] checks are made.
pub async fn poll_until_done<T, F, Fut>(operation_name: &str, mut fetch: F) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OperationStatus<T>, Error>>,
{
    let mut consecutive_failures = 0u32;

    for attempt in 1..=MAX_POLL_ATTEMPTS {
        tokio::time::sleep(POLL_INTERVAL).await;

        match fetch().await {
            Ok(status) => {
                consecutive_failures = 0;
                if let Some(outcome) = status.into_terminal_outcome() {
                    return outcome;
                }
                debug!(
                    operation = operation_name,
                    attempt,
                    max_attempts = MAX_POLL_ATTEMPTS,
                    "operation still running"
                );
            }
            Err(e) => {
                consecutive_failures += 1;
                warn!(
                    operation = operation_name,
                    attempt,
                    consecutive_failures,
                    error = %e,
                    "status check failed"
                );
                if consecutive_failures >= MAX_CONSECUTIVE_POLL_FAILURES {
                    return PollOutcome::PollError(e.to_string());
                }
            }
        }
    }

    PollOutcome::TimedOut
}
