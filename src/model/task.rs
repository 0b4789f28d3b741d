//! Task board entries and manual overrides

use serde::{Deserialize, Serialize};

/// Task identifier as reported by the agent runtime
pub type TaskId = i64;

/// Canonical task status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// Map a raw runtime status onto the canonical set.
    ///
    /// Unknown values are treated as pending.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "created" | "pending" => TaskStatus::Pending,
            "in_progress" | "running" => TaskStatus::InProgress,
            "completed" | "done" => TaskStatus::Completed,
            "failed" | "blocked" | "error" => TaskStatus::Blocked,
            _ => TaskStatus::Pending,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry on the task board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub owner: Option<String>,
    pub blocked_by: Option<Vec<TaskId>>,
}

/// Manual override for a task. Set fields replace the derived values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    /// `Some(None)` clears the owner
    pub owner: Option<Option<String>>,
    /// `Some(None)` clears the blockers
    pub blocked_by: Option<Option<Vec<TaskId>>>,
}

impl TaskPatch {
    /// Fold a newer patch into this one; fields set in `newer` win.
    pub fn merge(&mut self, newer: TaskPatch) {
        if newer.title.is_some() {
            self.title = newer.title;
        }
        if newer.status.is_some() {
            self.status = newer.status;
        }
        if newer.owner.is_some() {
            self.owner = newer.owner;
        }
        if newer.blocked_by.is_some() {
            self.blocked_by = newer.blocked_by;
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(owner) = &self.owner {
            task.owner = owner.clone();
        }
        if let Some(blocked_by) = &self.blocked_by {
            task.blocked_by = blocked_by.clone();
        }
    }
}
