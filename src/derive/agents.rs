//! Agent status derivation

use crate::config::SyncConfig;
use crate::model::{AgentKind, AgentPhase, AgentStatus};
use crate::stream::StreamSnapshot;

/// Id of the main agent node; stable across snapshots
pub const MAIN_AGENT_ID: &str = "main";

/// Derive the agent tree from a snapshot.
///
/// The stream only describes the main agent, so the result always holds one
/// node without children. Subagents and the error phase only appear through
/// direct updates.
pub fn derive_agent_status(snapshot: &StreamSnapshot, config: &SyncConfig) -> Vec<AgentStatus> {
    let descriptor = &snapshot.agent_state;

    let core_type = descriptor
        .core_type
        .as_deref()
        .map(str::trim)
        .filter(|core| !core.is_empty())
        .unwrap_or("default");

    let status = match (snapshot.connected, snapshot.is_running) {
        (false, _) => AgentPhase::Idle,
        (true, true) => AgentPhase::Acting,
        (true, false) => AgentPhase::Complete,
    };

    let context_usage = descriptor
        .context_usage
        .map(|usage| usage.round() as i64)
        .unwrap_or(0);

    let model = descriptor
        .model
        .clone()
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| config.default_model.clone());

    vec![AgentStatus {
        id: MAIN_AGENT_ID.to_string(),
        name: format!("{} ({})", config.agent_name, core_type),
        kind: AgentKind::Main,
        status,
        context_usage,
        model,
        current_action: snapshot.current_step.clone(),
        children: Vec::new(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::AgentDescriptor;

    fn snapshot(connected: bool, is_running: bool) -> StreamSnapshot {
        StreamSnapshot {
            connected,
            is_running,
            ..Default::default()
        }
    }

    #[test]
    fn test_disconnected_is_idle_with_default_name() {
        let agents = derive_agent_status(&snapshot(false, true), &SyncConfig::default());
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].status, AgentPhase::Idle);
        assert_eq!(agents[0].name, "Super-Goose (default)");
        assert_eq!(agents[0].kind, AgentKind::Main);
        assert!(agents[0].children.is_empty());
    }

    #[test]
    fn test_running_is_acting() {
        let mut snap = snapshot(true, true);
        snap.agent_state = AgentDescriptor {
            core_type: Some("structured".to_string()),
            model: Some("claude-sonnet".to_string()),
            context_usage: Some(63.6),
        };
        snap.current_step = Some("Editing src/lib.rs".to_string());

        let agent = &derive_agent_status(&snap, &SyncConfig::default())[0];
        assert_eq!(agent.status, AgentPhase::Acting);
        assert_eq!(agent.name, "Super-Goose (structured)");
        assert_eq!(agent.model, "claude-sonnet");
        assert_eq!(agent.context_usage, 64);
        assert_eq!(agent.current_action.as_deref(), Some("Editing src/lib.rs"));
    }

    #[test]
    fn test_connected_idle_is_complete() {
        let agent = &derive_agent_status(&snapshot(true, false), &SyncConfig::default())[0];
        assert_eq!(agent.status, AgentPhase::Complete);
        assert_eq!(agent.context_usage, 0);
        assert_eq!(agent.model, "default");
        assert!(agent.current_action.is_none());
    }

    #[test]
    fn test_id_is_stable() {
        let config = SyncConfig::default();
        let a = derive_agent_status(&snapshot(false, false), &config);
        let b = derive_agent_status(&snapshot(true, true), &config);
        assert_eq!(a[0].id, b[0].id);
    }
}
