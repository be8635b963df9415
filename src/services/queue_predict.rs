//! Queue-based prediction client.
//!
//! Two-phase protocol: enqueue a prompt with a fresh session token, obtain
//! an `event_id`, then poll the data endpoint with that pair until a result
//! or error arrives or the attempt budget runs out. Each invocation owns a
//! disjoint token/event-id pair, so concurrent predictions never cross-talk.

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::models::prediction::{QueueJoinRequest, QueueJoinResponse, QueueReply};
use crate::services::predict::PREDICTION_FAILED;

/// Sentinel when the poll budget runs out without a result. Distinct from a
/// server-reported error.
pub const PREDICTION_NOT_AVAILABLE: &str = "Prediction not available";

const ERROR_PREFIX: &str = "Prediction error";
const GENERIC_QUEUE_ERROR: &str = "the prediction service reported an error";

pub const SESSION_TOKEN_LEN: usize = 11;

/// Client-generated correlation token for one join+poll exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Prompt sent to the prediction service, fixing the reply format so the
/// first data element is directly displayable.
pub fn build_prompt(team_a: &str, team_b: &str) -> String {
    format!(
        "You are a football pundit. Based on recent form, predict the final \
         score of the next match between {team_a} and {team_b}. Reply with \
         exactly one line in the format: Prediction: {team_a} X - Y {team_b} \
         (replace X and Y with whole numbers such as 0, 1, 2, 3). Write \
         nothing else."
    )
}

/// Endpoints and protocol constants for the queue exchange.
#[derive(Debug, Clone)]
pub struct QueuePredictConfig {
    pub join_url: String,
    pub data_url: String,
    pub poll_interval: Duration,
    pub max_attempts: u32,
    pub fn_index: u32,
    pub trigger_id: u32,
}

impl QueuePredictConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            join_url: config.queue_join_url.clone(),
            data_url: config.queue_data_url.clone(),
            poll_interval: Duration::from_millis(config.queue_poll_interval_ms),
            max_attempts: config.queue_poll_max_attempts,
            fn_index: config.queue_fn_index,
            trigger_id: config.queue_trigger_id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueuePredictError {
    #[error("HTTP request failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("queue join rejected: HTTP {0}")]
    Join(StatusCode),

    #[error("queue join response carried no event_id")]
    MissingEventId,

    #[error("prediction poll attempts exhausted")]
    Timeout,

    #[error("prediction service reported an error: {0}")]
    Reported(String),
}

/// Clears the busy flag on every exit path, including early returns from a
/// failed join.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct QueuePredictClient {
    http: Client,
    config: QueuePredictConfig,
    predicting: Arc<AtomicBool>,
}

impl QueuePredictClient {
    pub fn new(http: Client, config: QueuePredictConfig) -> Self {
        Self {
            http,
            config,
            predicting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a join+poll exchange is currently in flight.
    pub fn is_predicting(&self) -> bool {
        self.predicting.load(Ordering::SeqCst)
    }

    /// Run the full join+poll exchange, reducing every failure to a fixed
    /// display string. Empty team names are a no-op with zero network calls.
    pub async fn predict(&self, team_a: &str, team_b: &str) -> String {
        if team_a.is_empty() || team_b.is_empty() {
            return String::new();
        }

        let _busy = BusyGuard::acquire(&self.predicting);
        metrics::counter!("predictions_total", "variant" => "queue").increment(1);

        match self.run(team_a, team_b).await {
            Ok(prediction) => prediction,
            Err(QueuePredictError::Timeout) => {
                tracing::warn!(
                    max_attempts = self.config.max_attempts,
                    "queue prediction poll budget exhausted"
                );
                PREDICTION_NOT_AVAILABLE.to_owned()
            }
            Err(QueuePredictError::Reported(message)) => {
                tracing::warn!(%message, "prediction service reported an error");
                format!("{ERROR_PREFIX}: {message}")
            }
            Err(err) => {
                tracing::warn!(error = %err, "queue prediction failed");
                PREDICTION_FAILED.to_owned()
            }
        }
    }

    async fn run(&self, team_a: &str, team_b: &str) -> Result<String, QueuePredictError> {
        let token = SessionToken::generate();
        let event_id = self.join(&token, team_a, team_b).await?;
        tracing::debug!(session = token.as_str(), %event_id, "joined prediction queue");
        self.poll(&token, &event_id).await
    }

    async fn join(
        &self,
        token: &SessionToken,
        team_a: &str,
        team_b: &str,
    ) -> Result<String, QueuePredictError> {
        let body = QueueJoinRequest {
            data: vec![build_prompt(team_a, team_b)],
            event_data: None,
            fn_index: self.config.fn_index,
            trigger_id: self.config.trigger_id,
            session_hash: token.as_str().to_owned(),
        };

        let response = self
            .http
            .post(&self.config.join_url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QueuePredictError::Join(status));
        }

        let body = response.text().await?;
        serde_json::from_str::<QueueJoinResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.event_id)
            .ok_or(QueuePredictError::MissingEventId)
    }

    async fn poll(
        &self,
        token: &SessionToken,
        event_id: &str,
    ) -> Result<String, QueuePredictError> {
        for attempt in 1..=self.config.max_attempts {
            sleep(self.config.poll_interval).await;

            let response = self
                .http
                .get(&self.config.data_url)
                .query(&[("session_hash", token.as_str()), ("event_id", event_id)])
                .send()
                .await;

            // Transient faults skip the attempt; the loop keeps its budget.
            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "queue data request failed");
                    continue;
                }
            };
            if !response.status().is_success() {
                tracing::debug!(attempt, status = %response.status(), "queue data request unsuccessful");
                continue;
            }
            let body: serde_json::Value = match response.json().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "queue data body unreadable");
                    continue;
                }
            };

            match QueueReply::resolve(&body) {
                QueueReply::Data(text) => {
                    tracing::info!(attempt, "queue prediction resolved");
                    return Ok(text);
                }
                QueueReply::Generating => {
                    tracing::trace!(attempt, "prediction still generating");
                }
                QueueReply::Error(message) => {
                    return Err(QueuePredictError::Reported(
                        message.unwrap_or_else(|| GENERIC_QUEUE_ERROR.to_owned()),
                    ));
                }
                QueueReply::Unknown => {
                    tracing::trace!(attempt, "unrecognized queue reply shape");
                }
            }
        }

        Err(QueuePredictError::Timeout)
    }
}
