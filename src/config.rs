//! Synchronizer configuration.

use std::time::Duration;

/// How often the extensions endpoint is polled.
pub const EXTENSIONS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How often the learned-skills endpoint is polled.
pub const SKILLS_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Runtime config for the panel store.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Display name of the main agent node
    pub agent_name: String,
    /// Model reported when the agent descriptor omits one
    pub default_model: String,
    /// Upper bound on retained file activity entries (newest kept)
    pub max_file_activity: usize,
    /// Upper bound on overrides waiting for a task that has not been derived
    /// yet (oldest dropped first)
    pub max_pending_overrides: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            agent_name: "Super-Goose".to_string(),
            default_model: "default".to_string(),
            max_file_activity: 200,
            max_pending_overrides: 64,
        }
    }
}
