//! Workflow facade tying the clients together around one analysis job.
//!
//! Errors never escape: every failure ends as a status message on the job
//! or a fixed prediction string. The caller reads state, it does not handle
//! errors.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::models::analysis::{AnalysisJob, AnalysisRequest, AnalysisStatus, SubmitOutcome};
use crate::services::analysis::{AnalysisClient, AnalysisError};
use crate::services::poller::{PollHandle, StatusPoller};
use crate::services::predict::PredictClient;
use crate::services::queue_predict::{QueuePredictClient, QueuePredictConfig};

const MSG_STARTING: &str = "Starting analysis...";
const MSG_RUNNING: &str = "Analysis in progress...";
const MSG_REJECTED: &str = "Could not start analysis";
const MSG_CONNECTION: &str = "Connection error";

/// Drives one analysis round: submit, poll to a terminal state, then predict
/// on demand.
pub struct AnalysisWorkflow {
    analysis: Arc<AnalysisClient>,
    predict: PredictClient,
    queue_predict: QueuePredictClient,
    job: Arc<Mutex<AnalysisJob>>,
    poll_interval: Duration,
    poll_max_attempts: u32,
}

impl AnalysisWorkflow {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pitchside/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            analysis: Arc::new(AnalysisClient::new(http.clone(), config.base_url.clone())),
            predict: PredictClient::new(http.clone(), config.base_url.clone()),
            queue_predict: QueuePredictClient::new(
                http,
                QueuePredictConfig::from_app_config(config),
            ),
            job: Arc::new(Mutex::new(AnalysisJob::new())),
            poll_interval: Duration::from_millis(config.status_poll_interval_ms),
            poll_max_attempts: config.status_poll_max_attempts,
        })
    }

    /// Connectivity check against the backend.
    pub async fn ping(&self) -> Result<String, AnalysisError> {
        self.analysis.ping().await
    }

    /// Submit the request and, once acknowledged, start polling for the
    /// result. Returns the poll handle when polling began; `None` means the
    /// job message explains what went wrong. Refuses to start while a round
    /// is outstanding, because the backend holds one job per connection.
    pub async fn start(&self, request: &AnalysisRequest) -> Option<PollHandle> {
        {
            let mut job = self.job.lock().await;
            if matches!(job.status, AnalysisStatus::Starting | AnalysisStatus::Running) {
                tracing::warn!(status = ?job.status, "analysis already outstanding, refusing to resubmit");
                return None;
            }
            // A fresh submission resets the previous round.
            *job = AnalysisJob::new();
            job.transition(AnalysisStatus::Starting, MSG_STARTING);
        }

        match self.analysis.submit(request).await {
            Ok(SubmitOutcome::Accepted(ack)) => {
                tracing::info!("analysis accepted by backend");
                tracing::debug!(ack = %ack, "submission acknowledgment payload");
                self.job
                    .lock()
                    .await
                    .transition(AnalysisStatus::Running, MSG_RUNNING);
                Some(StatusPoller::spawn(
                    Arc::clone(&self.analysis),
                    Arc::clone(&self.job),
                    self.poll_interval,
                    self.poll_max_attempts,
                ))
            }
            Ok(SubmitOutcome::Rejected) => {
                self.job
                    .lock()
                    .await
                    .transition(AnalysisStatus::Error, MSG_REJECTED);
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "analysis submission failed");
                self.job
                    .lock()
                    .await
                    .transition(AnalysisStatus::Error, MSG_CONNECTION);
                None
            }
        }
    }

    /// Snapshot of the current job.
    pub async fn job(&self) -> AnalysisJob {
        self.job.lock().await.clone()
    }

    /// Simple single-request prediction. Only permitted once the analysis
    /// job completed; otherwise a no-op returning the empty string.
    pub async fn predict_simple(&self, team_a: &str, team_b: &str) -> String {
        if !self.prediction_allowed().await {
            return String::new();
        }
        self.predict.predict(team_a, team_b).await
    }

    /// Queue-based prediction, gated the same way as [`predict_simple`].
    ///
    /// [`predict_simple`]: Self::predict_simple
    pub async fn predict_via_queue(&self, team_a: &str, team_b: &str) -> String {
        if !self.prediction_allowed().await {
            return String::new();
        }
        self.queue_predict.predict(team_a, team_b).await
    }

    /// Whether a queue prediction exchange is currently in flight.
    pub fn is_predicting(&self) -> bool {
        self.queue_predict.is_predicting()
    }

    async fn prediction_allowed(&self) -> bool {
        let allowed = self.job.lock().await.status == AnalysisStatus::Completed;
        if !allowed {
            tracing::debug!("prediction requested before analysis completed");
        }
        allowed
    }
}
