use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder sent when the user left the team A field blank.
pub const DEFAULT_TEAM_A: &str = "defaultTeamA";
/// Placeholder sent when the user left the team B field blank.
pub const DEFAULT_TEAM_B: &str = "defaultTeamB";

/// User-entered form fields plus the optional jersey attachments.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub team_a: String,
    pub team_b: String,
    pub main_referee: String,
    pub side_referee: String,
    pub video_url: Option<String>,
    pub team_a_jersey: Option<JerseyImage>,
    pub team_b_jersey: Option<JerseyImage>,
}

impl AnalysisRequest {
    /// Team A name as sent on the wire. The backend requires both team
    /// fields, so a blank entry is replaced with the placeholder.
    pub fn team_a_or_default(&self) -> &str {
        if self.team_a.trim().is_empty() {
            DEFAULT_TEAM_A
        } else {
            &self.team_a
        }
    }

    /// Team B name as sent on the wire, placeholder-substituted when blank.
    pub fn team_b_or_default(&self) -> &str {
        if self.team_b.trim().is_empty() {
            DEFAULT_TEAM_B
        } else {
            &self.team_b
        }
    }
}

/// Opaque binary jersey attachment.
#[derive(Debug, Clone)]
pub struct JerseyImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Lifecycle of the single outstanding analysis job.
///
/// `TimedOut` is reached when the status poll budget runs out; the backend
/// itself never reports it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Idle,
    Starting,
    Running,
    Completed,
    Error,
    TimedOut,
}

impl AnalysisStatus {
    /// A terminal job never transitions again without a fresh submission.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisStatus::Completed | AnalysisStatus::Error | AnalysisStatus::TimedOut
        )
    }
}

/// The current analysis round as seen by the user.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub status: AnalysisStatus,
    pub message: String,
    pub result: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisJob {
    pub fn new() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            message: String::new(),
            result: None,
            updated_at: Utc::now(),
        }
    }

    pub fn transition(&mut self, status: AnalysisStatus, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
        self.updated_at = Utc::now();
    }
}

impl Default for AnalysisJob {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire shape of `GET /analysis-status`. Unknown `status` strings mean the
/// job is still in flight.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

/// Immediate verdict of the submission call. `Accepted` requires both a
/// successful HTTP status and a JSON body; a bare acknowledgment body is
/// logged and treated as `Rejected`.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Accepted(serde_json::Value),
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_team_names_get_placeholders() {
        let request = AnalysisRequest {
            team_b: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(request.team_a_or_default(), DEFAULT_TEAM_A);
        assert_eq!(request.team_b_or_default(), DEFAULT_TEAM_B);
    }

    #[test]
    fn filled_team_names_pass_through() {
        let request = AnalysisRequest {
            team_a: "Galatasaray".to_string(),
            team_b: "Fenerbahce".to_string(),
            ..Default::default()
        };
        assert_eq!(request.team_a_or_default(), "Galatasaray");
        assert_eq!(request.team_b_or_default(), "Fenerbahce");
    }

    #[test]
    fn terminal_states() {
        assert!(AnalysisStatus::Completed.is_terminal());
        assert!(AnalysisStatus::Error.is_terminal());
        assert!(AnalysisStatus::TimedOut.is_terminal());
        assert!(!AnalysisStatus::Idle.is_terminal());
        assert!(!AnalysisStatus::Starting.is_terminal());
        assert!(!AnalysisStatus::Running.is_terminal());
    }

    #[test]
    fn transition_updates_message_and_timestamp() {
        let mut job = AnalysisJob::new();
        let created = job.updated_at;
        job.transition(AnalysisStatus::Starting, "Starting analysis...");
        assert_eq!(job.status, AnalysisStatus::Starting);
        assert_eq!(job.message, "Starting analysis...");
        assert!(job.updated_at >= created);
    }

    #[test]
    fn status_response_tolerates_missing_results() {
        let parsed: StatusResponse = serde_json::from_str(r#"{"status":"running"}"#).unwrap();
        assert_eq!(parsed.status, "running");
        assert!(parsed.results.is_none());
    }
}
