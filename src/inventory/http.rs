//! HTTP inventory client

use super::{ExtensionRecord, InventoryClient, SkillRecord};
use crate::{PanelError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Requests that take longer than this count as "no data"
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Inventory client backed by the agent server's REST endpoints
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);
        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        decode_list(body, key)
    }
}

/// Accept either a bare array or an object wrapping the array under `key`
fn decode_list<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>> {
    let list = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| PanelError::Inventory(format!("response has no '{}' field", key)))?,
        other => {
            return Err(PanelError::Inventory(format!(
                "unexpected response body: {}",
                other
            )));
        }
    };
    Ok(serde_json::from_value(list)?)
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn get_extensions(&self) -> Option<Vec<ExtensionRecord>> {
        match self.fetch_list("extensions", "extensions").await {
            Ok(list) => Some(list),
            Err(e) => {
                tracing::warn!("Extensions fetch from {} failed: {}", self.base_url, e);
                None
            }
        }
    }

    async fn get_learning_skills(&self) -> Option<Vec<SkillRecord>> {
        match self.fetch_list("learning/skills", "skills").await {
            Ok(list) => Some(list),
            Err(e) => {
                tracing::warn!("Skills fetch from {} failed: {}", self.base_url, e);
                None
            }
        }
    }
}
