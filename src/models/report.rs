//! Typed projection of the analysis report payload.
//!
//! The workflow itself treats the payload as opaque JSON; only the presenter
//! deserializes it. Every field defaults, so a report with missing sections
//! still projects the rest. Wire field names for recent matches come from the
//! scraping backend and are renamed here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub teams: TeamsSection,
    #[serde(default)]
    pub referees: RefereesSection,
    #[serde(default)]
    pub head_to_head: Vec<HeadToHeadMatch>,
}

impl AnalysisReport {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamsSection {
    #[serde(default)]
    pub team_a: TeamReport,
    #[serde(default)]
    pub team_b: TeamReport,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamReport {
    #[serde(default)]
    pub name: String,
    /// Free-form scraped key/value facts (league, squad value, ...).
    #[serde(default)]
    pub info: serde_json::Map<String, serde_json::Value>,
    /// Base64-encoded club logo.
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub last_matches: Vec<RecentMatch>,
    #[serde(default)]
    pub stats: FormStats,
    #[serde(default)]
    pub performance_analysis: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentMatch {
    #[serde(rename = "tarih", default)]
    pub date: String,
    #[serde(rename = "rakip", default)]
    pub opponent: String,
    #[serde(rename = "sonuc", default)]
    pub score: String,
    #[serde(rename = "dizilis", default)]
    pub formation: String,
    /// Win/draw/loss marker as emitted by the backend.
    #[serde(rename = "emoji", default)]
    pub outcome: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FormStats {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub losses: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefereesSection {
    #[serde(default)]
    pub main: Option<RefereeReport>,
    #[serde(default)]
    pub side: Option<RefereeReport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefereeReport {
    #[serde(default)]
    pub name: String,
    /// HTML fragment with card/penalty averages.
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub referee_analysis: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadToHeadMatch {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub guest_team: String,
    #[serde(default)]
    pub result: String,
}
