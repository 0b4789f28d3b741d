//! Inventory poll client
//!
//! Extensions and learned skills are pulled from the backend on fixed
//! intervals. A fetch either yields a list (possibly empty) or no data at all;
//! the two outcomes are deliberately distinct.

mod http;

pub use http::HttpInventoryClient;

use crate::model::{Plugin, Skill};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Extension record as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionRecord {
    pub key: String,
    pub name: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl ExtensionRecord {
    /// Stable identifier: the key, or the name when the key is blank
    pub fn identifier(&self) -> &str {
        if self.key.trim().is_empty() {
            &self.name
        } else {
            &self.key
        }
    }
}

impl From<&ExtensionRecord> for Plugin {
    fn from(record: &ExtensionRecord) -> Self {
        Self {
            id: record.identifier().to_string(),
            name: record.name.clone(),
            enabled: record.enabled,
            kind: record.kind.clone(),
            description: record.description.clone(),
        }
    }
}

/// Learned-skill record as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub verified: Option<bool>,
    pub usage_count: u64,
    pub created_at: String,
}

impl From<&SkillRecord> for Skill {
    fn from(record: &SkillRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            verified: record.verified.unwrap_or(false),
            usage_count: record.usage_count,
            created_at: record.created_at.clone(),
        }
    }
}

/// Source of inventory data.
///
/// `None` means "no data" (transport or decode failure, or nothing resolved);
/// `Some(vec![])` is a confirmed empty inventory.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_extensions(&self) -> Option<Vec<ExtensionRecord>>;

    async fn get_learning_skills(&self) -> Option<Vec<SkillRecord>>;
}

/// Client for running without a backend. Never yields data.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineInventory;

#[async_trait]
impl InventoryClient for OfflineInventory {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn get_extensions(&self) -> Option<Vec<ExtensionRecord>> {
        None
    }

    async fn get_learning_skills(&self) -> Option<Vec<SkillRecord>> {
        None
    }
}
