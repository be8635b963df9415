use serde::Deserialize;

/// Process-wide configuration, resolved once at startup and immutable
/// thereafter. Every field has a default so an empty environment works.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Backend origin for analysis and simple prediction calls.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Period of the analysis status poll.
    #[serde(default = "default_status_poll_interval_ms")]
    pub status_poll_interval_ms: u64,

    /// Status queries issued before the job is marked timed out.
    #[serde(default = "default_status_poll_max_attempts")]
    pub status_poll_max_attempts: u32,

    /// Queue-join endpoint of the prediction service.
    #[serde(default = "default_queue_join_url")]
    pub queue_join_url: String,

    /// Queue-data endpoint of the prediction service.
    #[serde(default = "default_queue_data_url")]
    pub queue_data_url: String,

    /// Period of the queue-data poll.
    #[serde(default = "default_queue_poll_interval_ms")]
    pub queue_poll_interval_ms: u64,

    /// Queue-data attempts before giving up on a prediction.
    #[serde(default = "default_queue_poll_max_attempts")]
    pub queue_poll_max_attempts: u32,

    /// Function index sent on queue join.
    #[serde(default)]
    pub queue_fn_index: u32,

    /// Trigger id sent on queue join.
    #[serde(default = "default_queue_trigger_id")]
    pub queue_trigger_id: u32,

    /// Per-request timeout for all backend calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.akillimacanalizi.com".to_string()
}

fn default_status_poll_interval_ms() -> u64 {
    5_000
}

fn default_status_poll_max_attempts() -> u32 {
    120
}

fn default_queue_join_url() -> String {
    "https://prediction.akillimacanalizi.com/queue/join".to_string()
}

fn default_queue_data_url() -> String {
    "https://prediction.akillimacanalizi.com/queue/data".to_string()
}

fn default_queue_poll_interval_ms() -> u64 {
    1_000
}

fn default_queue_poll_max_attempts() -> u32 {
    60
}

fn default_queue_trigger_id() -> u32 {
    7
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Load from `PITCHSIDE_`-prefixed environment variables, reading a
    /// `.env` file first when one exists.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed("PITCHSIDE_").from_env()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            status_poll_interval_ms: default_status_poll_interval_ms(),
            status_poll_max_attempts: default_status_poll_max_attempts(),
            queue_join_url: default_queue_join_url(),
            queue_data_url: default_queue_data_url(),
            queue_poll_interval_ms: default_queue_poll_interval_ms(),
            queue_poll_max_attempts: default_queue_poll_max_attempts(),
            queue_fn_index: 0,
            queue_trigger_id: default_queue_trigger_id(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_yields_defaults() {
        let config: AppConfig = envy::prefixed("PITCHSIDE_")
            .from_iter(std::iter::empty::<(String, String)>())
            .unwrap();
        assert_eq!(config.base_url, "https://api.akillimacanalizi.com");
        assert_eq!(config.status_poll_interval_ms, 5_000);
        assert_eq!(config.status_poll_max_attempts, 120);
        assert_eq!(config.queue_poll_interval_ms, 1_000);
        assert_eq!(config.queue_poll_max_attempts, 60);
        assert_eq!(config.queue_fn_index, 0);
        assert_eq!(config.queue_trigger_id, 7);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let vars = vec![
            (
                "PITCHSIDE_BASE_URL".to_string(),
                "http://localhost:8000".to_string(),
            ),
            (
                "PITCHSIDE_STATUS_POLL_MAX_ATTEMPTS".to_string(),
                "10".to_string(),
            ),
        ];
        let config: AppConfig = envy::prefixed("PITCHSIDE_").from_iter(vars).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.status_poll_max_attempts, 10);
        assert_eq!(config.queue_poll_max_attempts, 60);
    }
}
