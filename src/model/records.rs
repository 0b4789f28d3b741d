//! Inventory and activity records shown in the panel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether an integration is live or merely offered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorState {
    Connected,
    Available,
}

/// An available or connected integration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connector {
    pub id: String,
    pub name: String,
    pub state: ConnectorState,
    pub description: String,
}

/// An installed extension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub kind: String,
    pub description: String,
}

/// A skill the agent has learned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub verified: bool,
    pub usage_count: u64,
    pub created_at: String,
}

/// Progress of a tool invocation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ToolCallStatus {
    /// Parse a runtime status string. Anything unrecognised is still running.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "pending" | "queued" => ToolCallStatus::Pending,
            "completed" | "done" | "success" => ToolCallStatus::Completed,
            "failed" | "error" => ToolCallStatus::Failed,
            _ => ToolCallStatus::Running,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Value,
    pub status: ToolCallStatus,
    pub started_at: DateTime<Utc>,
}

/// A file the agent touched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileActivity {
    pub id: String,
    pub path: String,
    pub operation: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
