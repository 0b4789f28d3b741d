//! Agent panel: state synchronizer for agent dashboards
//!
//! Merges a live agent event stream with periodically polled inventory
//! endpoints into one consistent, renderable panel state.

pub mod cli;
pub mod config;
pub mod derive;
pub mod inventory;
pub mod model;
pub mod store;
pub mod stream;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("agent panel state accessed outside of an active {0} provider")]
    NoActiveStore(&'static str),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Inventory error: {0}")]
    Inventory(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PanelError>;
