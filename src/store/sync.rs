//! Consolidated panel state and the rules for folding inputs into it

use crate::config::SyncConfig;
use crate::derive::{
    build_connectors, derive_agent_status, derive_file_activity, derive_messages,
    derive_tool_calls, extract_tasks_from_stream, keep_newest,
};
use crate::inventory::{ExtensionRecord, SkillRecord};
use crate::model::{
    AgentPanelState, AgentPatch, ChatMessage, FileActivity, PanelMode, Plugin, Skill, Task,
    TaskId, TaskPatch, ToolCall,
};
use crate::stream::StreamSnapshot;
use crate::{PanelError, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Single-writer state behind the store.
///
/// `state` is the value consumers see; the other fields are the inputs it is
/// rebuilt from.
pub(crate) struct SyncState {
    pub(crate) state: AgentPanelState,
    /// Last snapshot folded in
    snapshot: Option<StreamSnapshot>,
    /// Tasks as derived from the stream, before overrides
    base_tasks: Vec<Task>,
    overrides: BTreeMap<TaskId, TaskPatch>,
    /// Overridden ids not on the board yet, oldest first
    pending: VecDeque<TaskId>,
    stream_messages: Vec<ChatMessage>,
    local_messages: Vec<ChatMessage>,
}

impl SyncState {
    pub(crate) fn new(config: &SyncConfig) -> Self {
        let state = AgentPanelState {
            agents: derive_agent_status(&StreamSnapshot::default(), config),
            connectors: build_connectors(None),
            ..Default::default()
        };
        Self {
            state,
            snapshot: None,
            base_tasks: Vec::new(),
            overrides: BTreeMap::new(),
            pending: VecDeque::new(),
            stream_messages: Vec::new(),
            local_messages: Vec::new(),
        }
    }

    /// Re-derive every stream-backed field. Returns false when the snapshot
    /// is identical to the last one and nothing changed.
    pub(crate) fn apply_snapshot(&mut self, snapshot: StreamSnapshot, config: &SyncConfig) -> bool {
        if self.snapshot.as_ref() == Some(&snapshot) {
            return false;
        }

        self.state.agents = derive_agent_status(&snapshot, config);
        self.state.tool_calls = derive_tool_calls(&snapshot);
        self.state.file_activity = derive_file_activity(&snapshot, config.max_file_activity);
        self.stream_messages = derive_messages(&snapshot);

        let base = extract_tasks_from_stream(&snapshot.activities, &snapshot.custom_events);
        self.prune_overrides(&base);
        self.base_tasks = base;

        self.rebuild_task_board();
        self.rebuild_messages();
        self.snapshot = Some(snapshot);

        tracing::debug!(
            "Re-derived panel state: {} tasks, {} tool calls, {} messages",
            self.state.task_board.len(),
            self.state.tool_calls.len(),
            self.state.messages.len()
        );
        true
    }

    /// Fold an extensions poll result. "No data" leaves everything as is.
    pub(crate) fn apply_extensions(&mut self, result: Option<Vec<ExtensionRecord>>) -> bool {
        let Some(records) = result else {
            return false;
        };
        self.state.plugins = records.iter().map(Plugin::from).collect();
        self.state.connectors = build_connectors(Some(records.as_slice()));
        true
    }

    /// Fold a skills poll result. "No data" leaves everything as is.
    pub(crate) fn apply_skills(&mut self, result: Option<Vec<SkillRecord>>) -> bool {
        let Some(records) = result else {
            return false;
        };
        self.state.skills = records.iter().map(Skill::from).collect();
        true
    }

    pub(crate) fn set_mode(&mut self, mode: PanelMode) {
        self.state.mode = mode;
    }

    pub(crate) fn update_agent(&mut self, id: &str, patch: &AgentPatch) -> Result<()> {
        let node = self
            .state
            .agents
            .iter_mut()
            .find_map(|agent| agent.find_mut(id))
            .ok_or_else(|| PanelError::AgentNotFound(id.to_string()))?;
        node.apply(patch);
        Ok(())
    }

    pub(crate) fn add_tool_call(&mut self, call: ToolCall) {
        self.state.tool_calls.push(call);
    }

    pub(crate) fn add_file_activity(&mut self, activity: FileActivity, config: &SyncConfig) {
        self.state.file_activity.push(activity);
        keep_newest(&mut self.state.file_activity, config.max_file_activity);
    }

    pub(crate) fn add_message(&mut self, message: ChatMessage) {
        self.local_messages.push(message);
        self.rebuild_messages();
    }

    /// Install or extend the manual override for a task.
    ///
    /// An override for an id that is not on the board waits for it, but at
    /// most `max_pending_overrides` wait at once; the oldest is dropped first.
    pub(crate) fn update_task(&mut self, id: TaskId, patch: TaskPatch, config: &SyncConfig) {
        self.overrides.entry(id).or_default().merge(patch);

        let derived = self.base_tasks.iter().any(|task| task.id == id);
        if !derived && !self.pending.contains(&id) {
            self.pending.push_back(id);
            while self.pending.len() > config.max_pending_overrides {
                let Some(oldest) = self.pending.pop_front() else {
                    break;
                };
                self.overrides.remove(&oldest);
                tracing::debug!("Dropped pending override for task {}", oldest);
            }
        }

        self.rebuild_task_board();
    }

    #[cfg(test)]
    pub(crate) fn has_override(&self, id: TaskId) -> bool {
        self.overrides.contains_key(&id)
    }

    /// Drop overrides whose task was derived before but no longer is.
    ///
    /// Overrides for ids never derived stay pending, bounded by
    /// `max_pending_overrides` in [`Self::update_task`]. Once their task
    /// appears they stop counting against that bound.
    fn prune_overrides(&mut self, next: &[Task]) {
        let previous: BTreeSet<TaskId> = self.base_tasks.iter().map(|t| t.id).collect();
        let current: BTreeSet<TaskId> = next.iter().map(|t| t.id).collect();
        self.overrides
            .retain(|id, _| current.contains(id) || !previous.contains(id));
        let overrides = &self.overrides;
        self.pending
            .retain(|id| overrides.contains_key(id) && !current.contains(id));
    }

    fn rebuild_task_board(&mut self) {
        self.state.task_board = self
            .base_tasks
            .iter()
            .map(|task| {
                let mut task = task.clone();
                if let Some(patch) = self.overrides.get(&task.id) {
                    patch.apply_to(&mut task);
                }
                task
            })
            .collect();
    }

    /// Snapshot messages first, then local ones the snapshot does not carry
    fn rebuild_messages(&mut self) {
        let seen: HashSet<&str> = self.stream_messages.iter().map(|m| m.id.as_str()).collect();
        let local: Vec<ChatMessage> = self
            .local_messages
            .iter()
            .filter(|m| !seen.contains(m.id.as_str()))
            .cloned()
            .collect();
        self.state.messages = self.stream_messages.clone();
        self.state.messages.extend(local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgentPhase, TaskStatus};
    use crate::stream::{
        ActivityMetadata, ActivityRecord, StreamMessage, TASK_UPDATE_TAG, TaskFields,
    };
    use chrono::Utc;
    use serde_json::json;

    fn task_activity(id: i64, title: &str, status: &str, timestamp: i64) -> ActivityRecord {
        ActivityRecord {
            id: format!("t{}-{}", id, timestamp),
            message: String::new(),
            metadata: ActivityMetadata {
                activity_type: Some(TASK_UPDATE_TAG.to_string()),
                task: TaskFields {
                    task_id: Some(json!(id)),
                    title: Some(title.to_string()),
                    status: Some(status.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            timestamp,
        }
    }

    fn snapshot_with(activities: Vec<ActivityRecord>) -> StreamSnapshot {
        StreamSnapshot {
            connected: true,
            activities,
            ..Default::default()
        }
    }

    fn local_message(id: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            role: "user".to_string(),
            content: "local".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_initial_state_has_fallback_connectors() {
        let sync = SyncState::new(&SyncConfig::default());
        assert_eq!(sync.state.connectors.len(), 5);
        assert_eq!(sync.state.agents[0].status, AgentPhase::Idle);
        assert!(sync.state.task_board.is_empty());
    }

    #[test]
    fn test_identical_snapshot_is_a_no_op() {
        let config = SyncConfig::default();
        let mut sync = SyncState::new(&config);
        let snapshot = snapshot_with(vec![task_activity(1, "One", "pending", 1)]);
        assert!(sync.apply_snapshot(snapshot.clone(), &config));
        assert!(!sync.apply_snapshot(snapshot, &config));
    }

    #[test]
    fn test_override_survives_new_base() {
        let config = SyncConfig::default();
        let mut sync = SyncState::new(&config);
        sync.apply_snapshot(snapshot_with(vec![task_activity(1, "One", "pending", 1)]), &config);

        sync.update_task(
            1,
            TaskPatch {
                owner: Some(Some("carol".to_string())),
                ..Default::default()
            },
            &config,
        );
        assert_eq!(sync.state.task_board[0].owner.as_deref(), Some("carol"));

        sync.apply_snapshot(
            snapshot_with(vec![
                task_activity(1, "One", "pending", 1),
                task_activity(1, "One, revised", "done", 2),
            ]),
            &config,
        );
        let task = &sync.state.task_board[0];
        assert_eq!(task.title, "One, revised");
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.owner.as_deref(), Some("carol"));
    }

    #[test]
    fn test_override_pruned_when_task_vanishes() {
        let config = SyncConfig::default();
        let mut sync = SyncState::new(&config);
        sync.apply_snapshot(snapshot_with(vec![task_activity(1, "One", "pending", 1)]), &config);
        sync.update_task(
            1,
            TaskPatch {
                status: Some(TaskStatus::Blocked),
                ..Default::default()
            },
            &config,
        );

        sync.apply_snapshot(snapshot_with(vec![]), &config);
        assert!(sync.state.task_board.is_empty());
        assert!(!sync.has_override(1));

        sync.apply_snapshot(snapshot_with(vec![task_activity(1, "One", "pending", 3)]), &config);
        assert_eq!(sync.state.task_board[0].status, TaskStatus::Pending);
    }

    #[test]
    fn test_pending_override_applies_when_task_appears() {
        let config = SyncConfig::default();
        let mut sync = SyncState::new(&config);
        sync.update_task(
            5,
            TaskPatch {
                title: Some("Planned".to_string()),
                ..Default::default()
            },
            &config,
        );
        assert!(sync.state.task_board.is_empty());

        sync.apply_snapshot(snapshot_with(vec![task_activity(5, "Raw", "running", 1)]), &config);
        assert_eq!(sync.state.task_board[0].title, "Planned");
        assert_eq!(sync.state.task_board[0].status, TaskStatus::InProgress);
    }

    #[test]
    fn test_pending_overrides_are_bounded() {
        let config = SyncConfig {
            max_pending_overrides: 2,
            ..Default::default()
        };
        let mut sync = SyncState::new(&config);
        sync.apply_snapshot(snapshot_with(vec![task_activity(1, "On board", "pending", 1)]), &config);

        let owner = |name: &str| TaskPatch {
            owner: Some(Some(name.to_string())),
            ..Default::default()
        };
        sync.update_task(1, owner("board"), &config);
        for id in [10, 11, 12] {
            sync.update_task(id, owner("waiting"), &config);
        }

        assert!(sync.has_override(1));
        assert!(!sync.has_override(10));
        assert!(sync.has_override(11));
        assert!(sync.has_override(12));

        // Re-patching a waiting id does not count twice
        sync.update_task(12, owner("again"), &config);
        assert!(sync.has_override(11));

        // Once derived, an override no longer counts as waiting
        sync.apply_snapshot(
            snapshot_with(vec![
                task_activity(1, "On board", "pending", 1),
                task_activity(11, "Arrived", "pending", 2),
            ]),
            &config,
        );
        sync.update_task(13, owner("waiting"), &config);
        assert!(sync.has_override(11));
        assert!(sync.has_override(12));
        assert!(sync.has_override(13));
        assert_eq!(sync.state.task(11).and_then(|t| t.owner.as_deref()), Some("waiting"));
    }

    #[test]
    fn test_no_data_keeps_inventory() {
        let mut sync = SyncState::new(&SyncConfig::default());
        let record = ExtensionRecord {
            key: "github".to_string(),
            name: "GitHub".to_string(),
            enabled: true,
            kind: "stdio".to_string(),
            description: String::new(),
        };
        assert!(sync.apply_extensions(Some(vec![record])));
        assert!(sync.apply_skills(Some(vec![SkillRecord {
            id: "s1".to_string(),
            ..Default::default()
        }])));

        assert!(!sync.apply_extensions(None));
        assert!(!sync.apply_skills(None));
        assert_eq!(sync.state.plugins.len(), 1);
        assert_eq!(sync.state.skills.len(), 1);
        assert_eq!(sync.state.connectors[0].id, "ext-github");

        assert!(sync.apply_extensions(Some(vec![])));
        assert!(sync.state.plugins.is_empty());
        assert_eq!(sync.state.connectors.len(), 5);
    }

    #[test]
    fn test_local_messages_survive_snapshots() {
        let config = SyncConfig::default();
        let mut sync = SyncState::new(&config);
        sync.add_message(local_message("local-1"));

        let mut snapshot = snapshot_with(vec![]);
        snapshot.messages = vec![StreamMessage {
            message_id: "m1".to_string(),
            role: "assistant".to_string(),
            content: "hello".to_string(),
            streaming: false,
            timestamp: 1,
        }];
        sync.apply_snapshot(snapshot, &config);

        let ids: Vec<_> = sync.state.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "local-1"]);

        sync.add_message(local_message("m1"));
        assert_eq!(sync.state.messages.len(), 2);
    }

    #[test]
    fn test_update_agent_unknown_id() {
        let mut sync = SyncState::new(&SyncConfig::default());
        let err = sync
            .update_agent("ghost", &AgentPatch::default())
            .unwrap_err();
        assert!(matches!(err, PanelError::AgentNotFound(id) if id == "ghost"));
    }
}
