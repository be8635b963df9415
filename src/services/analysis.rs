use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;

use crate::models::analysis::{AnalysisRequest, StatusResponse, SubmitOutcome};

/// Client for the match analysis backend.
pub struct AnalysisClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("HTTP request failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Failed to parse backend response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Backend rejected the request: HTTP {0}")]
    Rejected(StatusCode),
}

#[derive(Deserialize)]
struct TestResponse {
    #[serde(default)]
    message: String,
}

impl AnalysisClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Connectivity check against `GET /test`.
    pub async fn ping(&self) -> Result<String, AnalysisError> {
        let url = format!("{}/test", self.base_url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AnalysisError::Rejected(response.status()));
        }
        let body: TestResponse = serde_json::from_str(&response.text().await?)?;
        Ok(body.message)
    }

    /// Submit the analysis form as a single multipart POST. One attempt, no
    /// retry; the user resubmits manually on failure.
    ///
    /// Both team fields are always sent (placeholder-substituted when blank);
    /// the video link and jersey attachments are included only when present.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<SubmitOutcome, AnalysisError> {
        metrics::counter!("analysis_submissions_total").increment(1);

        let mut form = multipart::Form::new()
            .text("team_a", request.team_a_or_default().to_owned())
            .text("team_b", request.team_b_or_default().to_owned())
            .text("main_ref", request.main_referee.clone())
            .text("side_ref", request.side_referee.clone());

        if let Some(video_url) = &request.video_url {
            form = form.text("youtube_url", video_url.clone());
        }
        if let Some(jersey) = &request.team_a_jersey {
            form = form.part(
                "team_a_jersey",
                multipart::Part::bytes(jersey.bytes.clone()).file_name(jersey.file_name.clone()),
            );
        }
        if let Some(jersey) = &request.team_b_jersey {
            form = form.part(
                "team_b_jersey",
                multipart::Part::bytes(jersey.bytes.clone()).file_name(jersey.file_name.clone()),
            );
        }

        let url = format!("{}/start-analysis", self.base_url);
        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "analysis submission rejected");
            return Ok(SubmitOutcome::Rejected);
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(payload) => Ok(SubmitOutcome::Accepted(payload)),
            Err(err) => {
                // A 200 with an empty or non-JSON body is a bare acknowledgment
                // with no payload to act on.
                tracing::warn!(error = %err, "submission response body is not JSON");
                Ok(SubmitOutcome::Rejected)
            }
        }
    }

    /// One status query against `GET /analysis-status`.
    pub async fn fetch_status(&self) -> Result<StatusResponse, AnalysisError> {
        let url = format!("{}/analysis-status", self.base_url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AnalysisError::Rejected(response.status()));
        }
        let parsed: StatusResponse = serde_json::from_str(&response.text().await?)?;
        Ok(parsed)
    }
}
