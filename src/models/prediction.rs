use serde::{Deserialize, Serialize};

/// JSON body of the queue-join call.
#[derive(Debug, Clone, Serialize)]
pub struct QueueJoinRequest {
    pub data: Vec<String>,
    pub event_data: Option<serde_json::Value>,
    pub fn_index: u32,
    pub trigger_id: u32,
    pub session_hash: String,
}

/// Body of a successful queue-join response. The `event_id` correlates the
/// join with the subsequent data polls.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueJoinResponse {
    #[serde(default)]
    pub event_id: Option<String>,
}

/// Resolution of the heterogeneous queue-data body. The poll loop keeps
/// going on `Generating` and `Unknown` and stops on the other two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueReply {
    /// A non-empty `data` array arrived; element 0 is the final result.
    Data(String),
    Generating,
    Error(Option<String>),
    Unknown,
}

impl QueueReply {
    /// Inspect whichever fields are present, falling back to `Unknown` for
    /// any shape the protocol does not cover.
    pub fn resolve(body: &serde_json::Value) -> Self {
        if let Some(first) = body
            .get("data")
            .and_then(serde_json::Value::as_array)
            .and_then(|data| data.first())
        {
            let text = first
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| first.to_string());
            return QueueReply::Data(text);
        }

        match body.get("status").and_then(serde_json::Value::as_str) {
            Some("generating") => QueueReply::Generating,
            Some("error") => QueueReply::Error(
                body.get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned),
            ),
            _ => QueueReply::Unknown,
        }
    }
}
