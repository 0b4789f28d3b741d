//! Panel state model
//!
//! Everything a consumer panel renders: the agent status tree, the task
//! board, connector/plugin/skill inventory and the activity logs.

mod records;
mod task;

pub use records::*;
pub use task::*;

use serde::{Deserialize, Serialize};

/// Position of a node in the agent tree
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Main,
    Subagent,
}

/// Lifecycle phase of an agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    Idle,
    Gathering,
    Acting,
    Verifying,
    Complete,
    Error,
}

impl AgentPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentPhase::Idle => "idle",
            AgentPhase::Gathering => "gathering",
            AgentPhase::Acting => "acting",
            AgentPhase::Verifying => "verifying",
            AgentPhase::Complete => "complete",
            AgentPhase::Error => "error",
        }
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of the agent status tree.
///
/// Main nodes may carry subagent children; subagents do not nest further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    /// Stable across recomputations
    pub id: String,
    pub name: String,
    pub kind: AgentKind,
    pub status: AgentPhase,
    /// Raw reported usage in percent; see [`AgentStatus::context_percent`]
    pub context_usage: i64,
    pub model: String,
    pub current_action: Option<String>,
    pub children: Vec<AgentStatus>,
}

impl AgentStatus {
    /// Context usage clamped to 0..=100 for display
    pub fn context_percent(&self) -> u8 {
        self.context_usage.clamp(0, 100) as u8
    }

    /// Find a node by id anywhere in this subtree
    pub fn find(&self, id: &str) -> Option<&AgentStatus> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`AgentStatus::find`]
    pub fn find_mut(&mut self, id: &str) -> Option<&mut AgentStatus> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Apply the fields set in `patch`
    pub fn apply(&mut self, patch: &AgentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(usage) = patch.context_usage {
            self.context_usage = usage;
        }
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(action) = &patch.current_action {
            self.current_action = action.clone();
        }
        if let Some(children) = &patch.children {
            self.children = children.clone();
        }
    }
}

/// Partial update for an agent node. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPatch {
    pub name: Option<String>,
    pub status: Option<AgentPhase>,
    pub context_usage: Option<i64>,
    pub model: Option<String>,
    /// `Some(None)` clears the current action
    pub current_action: Option<Option<String>>,
    pub children: Option<Vec<AgentStatus>>,
}

/// Tri-state view preference of the panel
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    #[default]
    Code,
    Cowork,
    Both,
}

/// Consolidated, renderable panel state.
///
/// Published as a whole; readers never observe a partially updated value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPanelState {
    pub mode: PanelMode,
    pub agents: Vec<AgentStatus>,
    pub skills: Vec<Skill>,
    pub plugins: Vec<Plugin>,
    pub connectors: Vec<Connector>,
    pub file_activity: Vec<FileActivity>,
    pub tool_calls: Vec<ToolCall>,
    pub task_board: Vec<Task>,
    pub messages: Vec<ChatMessage>,
}

impl AgentPanelState {
    /// Find an agent node by id anywhere in the tree
    pub fn find_agent(&self, id: &str) -> Option<&AgentStatus> {
        self.agents.iter().find_map(|agent| agent.find(id))
    }

    /// Look up a task on the board
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.task_board.iter().find(|task| task.id == id)
    }
}
