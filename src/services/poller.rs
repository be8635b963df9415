//! Recurring status poll for an outstanding analysis job.
//!
//! The poll runs as a spawned task behind a [`PollHandle`]: it fires on a
//! constant interval, stops on the first terminal tick, and can be cancelled
//! exactly once from the outside. The backend never reports a failure on
//! this endpoint, so the poller caps its attempts and marks the job
//! `TimedOut` when the budget runs out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::models::analysis::{AnalysisJob, AnalysisStatus};
use crate::services::analysis::AnalysisClient;

pub(crate) const MSG_COMPLETED: &str = "Analysis complete";
pub(crate) const MSG_TIMED_OUT: &str = "Analysis timed out";

pub struct StatusPoller;

impl StatusPoller {
    /// Spawn the recurring status query task. The job should already be
    /// `Running`; the poller is its only writer until a terminal state.
    pub fn spawn(
        client: Arc<AnalysisClient>,
        job: Arc<Mutex<AnalysisJob>>,
        interval: Duration,
        max_attempts: u32,
    ) -> PollHandle {
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();
        let task = tokio::spawn(async move {
            poll_until_terminal(client, job, interval, max_attempts, task_token).await
        });
        PollHandle {
            cancel_token,
            cancelled: AtomicBool::new(false),
            task: Some(task),
        }
    }
}

async fn poll_until_terminal(
    client: Arc<AnalysisClient>,
    job: Arc<Mutex<AnalysisJob>>,
    interval: Duration,
    max_attempts: u32,
    cancel: CancellationToken,
) -> AnalysisStatus {
    for attempt in 1..=max_attempts {
        tokio::select! {
            _ = sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!(attempt, "status poll cancelled");
                return job.lock().await.status;
            }
        }

        metrics::counter!("analysis_status_polls_total").increment(1);

        match client.fetch_status().await {
            Ok(response) if response.status == "completed" => {
                tracing::info!(attempt, "analysis completed");
                let mut job = job.lock().await;
                job.result = response.results;
                job.transition(AnalysisStatus::Completed, MSG_COMPLETED);
                return AnalysisStatus::Completed;
            }
            Ok(response) => {
                tracing::debug!(attempt, status = %response.status, "analysis still in flight");
            }
            Err(err) => {
                // A failed tick is transient; the next tick retries.
                tracing::warn!(attempt, error = %err, "status query failed");
            }
        }
    }

    tracing::warn!(max_attempts, "status poll budget exhausted");
    let mut job = job.lock().await;
    job.transition(AnalysisStatus::TimedOut, MSG_TIMED_OUT);
    AnalysisStatus::TimedOut
}

/// Owning handle to the poll task. Dropping it cancels the poll, so a torn
/// down owner never leaks a ticking task.
pub struct PollHandle {
    cancel_token: CancellationToken,
    cancelled: AtomicBool,
    task: Option<JoinHandle<AnalysisStatus>>,
}

impl PollHandle {
    /// Stop the poll. The first call cancels; every later call is a no-op,
    /// including after the poll already reached a terminal state on its own.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.cancel_token.cancel();
        }
    }

    /// Wait for the poll task to finish and return the job status it ended
    /// on.
    pub async fn wait(mut self) -> AnalysisStatus {
        let task = match self.task.take() {
            Some(task) => task,
            None => return AnalysisStatus::Idle,
        };
        match task.await {
            Ok(status) => status,
            Err(err) => {
                tracing::error!(error = %err, "status poll task failed");
                AnalysisStatus::Error
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_handle() -> PollHandle {
        PollHandle {
            cancel_token: CancellationToken::new(),
            cancelled: AtomicBool::new(false),
            task: Some(tokio::spawn(async { AnalysisStatus::Completed })),
        }
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let handle = finished_handle();
        handle.cancel();
        handle.cancel();
        assert_eq!(handle.wait().await, AnalysisStatus::Completed);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_a_no_op() {
        let handle = finished_handle();
        let status = {
            handle.cancel_token.cancel();
            handle.wait().await
        };
        assert_eq!(status, AnalysisStatus::Completed);
    }
}
