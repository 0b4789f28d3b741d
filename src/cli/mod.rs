//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inventory backend used when `--base-url` is not given
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "agent-panel")]
#[command(about = "Consolidated agent panel state from a stream snapshot and inventory backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the inventory backend
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive panel state from a snapshot file once and print it as JSON
    Derive {
        /// Path to a stream snapshot (JSON)
        snapshot: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Poll the inventory backend and print every published state
    Watch {
        /// Path to a stream snapshot (JSON), re-read periodically
        snapshot: PathBuf,

        /// Seconds between snapshot reloads
        #[arg(short, long, default_value_t = 2)]
        reload_secs: u64,
    },
}
