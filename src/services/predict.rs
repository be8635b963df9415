use reqwest::Client;
use serde::Deserialize;

/// Shown when the backend answered without a usable `prediction` field.
pub const PREDICTION_FALLBACK: &str = "Prediction unavailable";
/// Shown when the prediction request itself failed.
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// Single-shot prediction client for `POST /predict-match`.
pub struct PredictClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
enum PredictError {
    #[error("HTTP request failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Failed to parse prediction response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    prediction: Option<String>,
}

impl PredictClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// One form-encoded prediction request, no retries. Empty team names are
    /// a no-op that performs zero network calls. Failures are logged and
    /// reduced to a fixed display string.
    pub async fn predict(&self, team_a: &str, team_b: &str) -> String {
        if team_a.is_empty() || team_b.is_empty() {
            return String::new();
        }

        metrics::counter!("predictions_total", "variant" => "simple").increment(1);

        match self.request(team_a, team_b).await {
            Ok(Some(prediction)) => prediction,
            Ok(None) => PREDICTION_FALLBACK.to_owned(),
            Err(err) => {
                tracing::warn!(error = %err, "simple prediction failed");
                PREDICTION_FAILED.to_owned()
            }
        }
    }

    async fn request(&self, team_a: &str, team_b: &str) -> Result<Option<String>, PredictError> {
        let url = format!("{}/predict-match", self.base_url);
        let params = [("team_a", team_a), ("team_b", team_b)];
        let response = self.http.post(&url).form(&params).send().await?;
        let body: PredictResponse = serde_json::from_str(&response.text().await?)?;
        Ok(body.prediction.filter(|p| !p.is_empty()))
    }
}
