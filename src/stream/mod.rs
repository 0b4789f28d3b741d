//! Stream snapshot consumed from the agent runtime
//!
//! The transport that carries the event stream lives elsewhere; this module
//! only defines the already-parsed snapshot shape. Field names follow the
//! runtime's wire contract.

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Tag marking an activity record or custom event as a task update
pub const TASK_UPDATE_TAG: &str = "task_update";

/// One observation of the agent event stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamSnapshot {
    pub connected: bool,
    pub is_running: bool,
    pub current_step: Option<String>,
    pub agent_state: AgentDescriptor,
    /// In-flight tool invocations keyed by call id
    pub active_tool_calls: BTreeMap<String, ToolInvocation>,
    pub activities: Vec<ActivityRecord>,
    pub custom_events: Vec<CustomEvent>,
    pub messages: Vec<StreamMessage>,
}

/// Free-form agent descriptor reported by the runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentDescriptor {
    pub core_type: Option<String>,
    pub model: Option<String>,
    pub context_usage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolInvocation {
    pub tool_call_id: String,
    pub tool_call_name: String,
    pub args: Value,
    pub status: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    pub id: String,
    pub message: String,
    pub metadata: ActivityMetadata,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityMetadata {
    pub file_path: Option<String>,
    pub operation: Option<String>,
    pub activity_type: Option<String>,
    #[serde(flatten)]
    pub task: TaskFields,
}

impl ActivityMetadata {
    pub fn is_task_update(&self) -> bool {
        self.activity_type.as_deref() == Some(TASK_UPDATE_TAG)
    }
}

/// Task fields shared by activity metadata and task-update event payloads.
///
/// `task_id` and `blocked_by` stay raw: the runtime sends either integers or
/// numeric strings, and validation happens during task extraction. The other
/// fields are read leniently; a value of the wrong type is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFields {
    pub task_id: Option<Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub owner: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub blocked_by: Option<Vec<Value>>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(items)),
        _ => Ok(None),
    }
}

/// Named event emitted by the runtime; payload shape depends on the name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomEvent {
    pub name: String,
    pub timestamp: i64,
    pub value: Value,
}

impl CustomEvent {
    /// Decode the payload of a task-update event. Returns `None` for any
    /// other event name or a payload that is not an object.
    pub fn task_fields(&self) -> Option<TaskFields> {
        if self.name != TASK_UPDATE_TAG {
            return None;
        }
        serde_json::from_value(self.value.clone()).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamMessage {
    pub message_id: String,
    pub role: String,
    pub content: String,
    pub streaming: bool,
    pub timestamp: i64,
}

/// Load a snapshot from a JSON file
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<StreamSnapshot> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let snapshot = serde_json::from_str(&raw)?;
    Ok(snapshot)
}

/// Convert a runtime timestamp (epoch milliseconds) to UTC.
///
/// Out-of-range values collapse to the epoch.
pub fn timestamp_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
