//! Connector assembly from extensions plus well-known fallbacks

use crate::inventory::ExtensionRecord;
use crate::model::{Connector, ConnectorState};
use std::collections::HashSet;

/// A built-in integration offered even when no extension provides it
#[derive(Debug, Clone, Copy)]
pub struct WellKnownConnector {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Fallback integrations, in display order
pub const WELL_KNOWN_CONNECTORS: [WellKnownConnector; 5] = [
    WellKnownConnector {
        id: "github",
        name: "GitHub",
        description: "Repositories, issues and pull requests",
    },
    WellKnownConnector {
        id: "slack",
        name: "Slack",
        description: "Team channels and direct messages",
    },
    WellKnownConnector {
        id: "google-drive",
        name: "Google Drive",
        description: "Documents, sheets and shared folders",
    },
    WellKnownConnector {
        id: "jira",
        name: "Jira",
        description: "Issue tracking and sprint boards",
    },
    WellKnownConnector {
        id: "notion",
        name: "Notion",
        description: "Pages, wikis and databases",
    },
];

impl From<&WellKnownConnector> for Connector {
    fn from(known: &WellKnownConnector) -> Self {
        Self {
            id: known.id.to_string(),
            name: known.name.to_string(),
            state: ConnectorState::Available,
            description: known.description.to_string(),
        }
    }
}

impl From<&ExtensionRecord> for Connector {
    fn from(record: &ExtensionRecord) -> Self {
        Self {
            id: format!("ext-{}", record.identifier()),
            name: record.name.clone(),
            state: if record.enabled {
                ConnectorState::Connected
            } else {
                ConnectorState::Available
            },
            description: record.kind.clone(),
        }
    }
}

/// Merge polled extensions with the well-known fallbacks.
///
/// Extension-derived connectors come first in their original order, followed
/// by every fallback whose name no extension claimed. Names are unique
/// case-insensitively: the first extension with a given name wins.
/// `None` (no data yet) and an empty list currently produce the same output.
pub fn build_connectors(extensions: Option<&[ExtensionRecord]>) -> Vec<Connector> {
    let mut claimed: HashSet<String> = HashSet::new();

    let mut connectors: Vec<Connector> = extensions
        .unwrap_or_default()
        .iter()
        .filter(|record| claimed.insert(record.name.to_lowercase()))
        .map(Connector::from)
        .collect();

    connectors.extend(
        WELL_KNOWN_CONNECTORS
            .iter()
            .filter(|known| !claimed.contains(&known.name.to_lowercase()))
            .map(Connector::from),
    );

    connectors
}
