//! Query Submitter/Poller
//!
//! Submits a statement to the query engine and polls at a fixed interval
//! until a terminal state or until the bounded wait elapses. Remote
//! failure, cancellation, timeout, and polling errors are all surfaced to
//! the caller as "no result"; the log distinguishes them.
//!
//! This is the pipeline's only suspension point. Time flows through the
//! injected [`Clock`] so tests run without real delays.

use crate::clock::Clock;
use crate::remote::{QueryEngine, QueryState};
use lakeline_common::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Terminal outcome of waiting on one query execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Succeeded(String),
    Failed { reason: String },
    TimedOut,
}

pub struct QuerySubmitter {
    engine: Arc<dyn QueryEngine>,
    clock: Arc<dyn Clock>,
    output_location: String,
    poll_interval: Duration,
    max_wait: Duration,
}

impl QuerySubmitter {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        clock: Arc<dyn Clock>,
        output_location: impl Into<String>,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Self {
        Self {
            engine,
            clock,
            output_location: output_location.into(),
            poll_interval,
            max_wait,
        }
    }

    /// Submit `sql` verbatim and wait for a terminal state. Returns the
    /// execution id on success, `None` on failure, cancellation, timeout,
    /// or submission error.
    pub async fn submit_and_wait(&self, sql: &str) -> Option<String> {
        let execution_id = match self.engine.start_query(sql, &self.output_location).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, query = %truncate(sql, 200), "Query submission failed");
                return None;
            },
        };
        debug!(execution_id = %execution_id, "Query submitted");

        match self.wait_for(&execution_id).await {
            Ok(WaitOutcome::Succeeded(id)) => {
                info!(execution_id = %id, "Query completed");
                Some(id)
            },
            Ok(WaitOutcome::Failed { reason }) => {
                warn!(execution_id = %execution_id, reason = %reason, "Query failed");
                None
            },
            Ok(WaitOutcome::TimedOut) => {
                warn!(execution_id = %execution_id, max_wait_secs = self.max_wait.as_secs(),
                    "Query timed out");
                None
            },
            Err(e) => {
                error!(execution_id = %execution_id, error = %e, "Query polling failed");
                None
            },
        }
    }

    /// Poll `execution_id` until terminal or until the bounded wait
    /// elapses.
    pub async fn wait_for(&self, execution_id: &str) -> Result<WaitOutcome> {
        let started = self.clock.now();

        while self.clock.now().duration_since(started) < self.max_wait {
            match self.engine.query_state(execution_id).await? {
                QueryState::Succeeded => {
                    return Ok(WaitOutcome::Succeeded(execution_id.to_string()));
                },
                QueryState::Failed { reason } => {
                    return Ok(WaitOutcome::Failed { reason });
                },
                QueryState::Cancelled { reason } => {
                    return Ok(WaitOutcome::Failed {
                        reason: format!("cancelled: {}", reason),
                    });
                },
                QueryState::Running => {},
            }
            self.clock.sleep(self.poll_interval).await;
        }

        Ok(WaitOutcome::TimedOut)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
