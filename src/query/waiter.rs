//! # Completion Waiter
//!
//! Bounded poll loop over a query execution. The loop polls, sleeps a fixed
//! interval and accounts the interval as waited time; once the waited time
//! reaches the ceiling without a terminal state the wait fails with
//! [`ReportError::QueryTimeout`]. Sleeping goes through [`Sleeper`] so tests
//! never wait on a real clock.

use super::{QueryExecutor, QueryState};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info};

/// Suspends the current task between polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How a successful wait went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    pub polls: u32,
    pub waited: Duration,
}

#[derive(Debug, Clone)]
pub struct CompletionWaiter<S = TokioSleeper> {
    poll_interval: Duration,
    max_wait: Duration,
    sleeper: S,
}

impl CompletionWaiter<TokioSleeper> {
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self::with_sleeper(poll_interval, max_wait, TokioSleeper)
    }
}

impl<S: Sleeper> CompletionWaiter<S> {
    pub fn with_sleeper(poll_interval: Duration, max_wait: Duration, sleeper: S) -> Self {
        Self {
            poll_interval,
            max_wait,
            sleeper,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Poll `execution_id` until it succeeds, fails, or the ceiling is reached
    pub async fn wait<E>(&self, executor: &E, execution_id: &str) -> Result<WaitOutcome>
    where
        E: QueryExecutor + ?Sized,
    {
        info!(
            execution_id,
            max_wait_seconds = self.max_wait.as_secs(),
            "Waiting for query to complete"
        );

        let mut waited = Duration::ZERO;
        let mut polls = 0u32;

        while waited < self.max_wait {
            let status = executor.get_status(execution_id).await?;
            polls += 1;
            debug!(execution_id, state = %status.state, waited_seconds = waited.as_secs(), "Query state");

            if status.state == QueryState::Succeeded {
                info!(execution_id, waited_seconds = waited.as_secs(), polls, "Query completed");
                return Ok(WaitOutcome { polls, waited });
            }
            if status.state.is_terminal() {
                let reason = status
                    .reason
                    .unwrap_or_else(|| "Unknown reason".to_string());
                error!(execution_id, state = %status.state, reason = %reason, "Query did not succeed");
                return Err(ReportError::query_failed(
                    execution_id,
                    status.state.to_string(),
                    reason,
                ));
            }

            self.sleeper.sleep(self.poll_interval).await;
            waited += self.poll_interval;
        }

        error!(execution_id, waited_seconds = waited.as_secs(), polls, "Query timed out");
        Err(ReportError::query_timeout(execution_id, waited))
    }
}
