//! Snapshot files folded through a mounted store

use agent_panel::config::SyncConfig;
use agent_panel::inventory::OfflineInventory;
use agent_panel::model::{AgentPhase, TaskStatus};
use agent_panel::store::PanelStore;
use agent_panel::stream::load_snapshot;
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "connected": true,
    "isRunning": false,
    "currentStep": "Summarising",
    "agentState": { "core_type": "structured", "model": "claude", "context_usage": 63.6 },
    "activeToolCalls": {
        "c1": { "toolCallId": "c1", "toolCallName": "read_file", "args": { "path": "README.md" }, "status": "completed", "timestamp": 1700000000000 }
    },
    "activities": [
        { "id": "a1", "message": "Edited lib", "metadata": { "file_path": "src/lib.rs", "operation": "edit" }, "timestamp": 1700000000100 },
        { "id": "a2", "message": "Plan", "metadata": { "activity_type": "task_update", "task_id": "1", "title": "Plan", "status": "done" }, "timestamp": 1700000000200 },
        { "id": "a3", "message": "Build", "metadata": { "activity_type": "task_update", "task_id": 2, "status": "pending", "blocked_by": ["1", "x"] }, "timestamp": 1700000000300 }
    ],
    "customEvents": [
        { "name": "task_update", "timestamp": 1700000000400, "value": { "task_id": "2", "status": "in_progress", "owner": "builder" } }
    ],
    "messages": [
        { "messageId": "m1", "role": "user", "content": "go", "streaming": false, "timestamp": 1700000000000 },
        { "messageId": "m2", "role": "assistant", "content": "wor", "streaming": true, "timestamp": 1700000000500 }
    ]
}"#;

#[tokio::test]
async fn derive_from_snapshot_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, SNAPSHOT).unwrap();

    let snapshot = load_snapshot(&path).unwrap();
    let store = PanelStore::mount(SyncConfig::default(), OfflineInventory);
    store.apply_snapshot(snapshot);
    let state = store.state();

    let main = &state.agents[0];
    assert_eq!(main.name, "Super-Goose (structured)");
    assert_eq!(main.status, AgentPhase::Complete);
    assert_eq!(main.context_usage, 64);
    assert_eq!(main.model, "claude");
    assert_eq!(main.current_action.as_deref(), Some("Summarising"));

    let ids: Vec<_> = state.task_board.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(state.task_board[0].status, TaskStatus::Completed);
    let build = &state.task_board[1];
    assert_eq!(build.status, TaskStatus::InProgress);
    assert_eq!(build.owner.as_deref(), Some("builder"));
    assert_eq!(build.title, "Task #2");

    assert_eq!(state.tool_calls.len(), 1);
    assert_eq!(state.file_activity.len(), 1);
    assert_eq!(state.file_activity[0].path, "src/lib.rs");
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].id, "m1");

    store.unmount();
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_snapshot(dir.path().join("absent.json")).is_err());
}

#[test]
fn invalid_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(load_snapshot(&path).is_err());
}
