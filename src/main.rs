use agent_panel::cli::{Cli, Commands};
use agent_panel::config::SyncConfig;
use agent_panel::inventory::{HttpInventoryClient, OfflineInventory};
use agent_panel::model::AgentPanelState;
use agent_panel::store::PanelStore;
use agent_panel::stream::load_snapshot;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agent_panel=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Derive { snapshot, pretty } => {
            let snapshot = load_snapshot(&snapshot)?;
            let store = PanelStore::mount(SyncConfig::default(), OfflineInventory);
            store.apply_snapshot(snapshot);
            print_state(&store.state(), pretty)?;
            store.unmount();
        }

        Commands::Watch {
            snapshot: path,
            reload_secs,
        } => {
            let client = HttpInventoryClient::new(cli.base_url)?;
            tracing::info!("Polling inventory at {}", client.base_url());

            let store = PanelStore::mount(SyncConfig::default(), client);
            let handle = store.handle();
            let mut updates = handle.subscribe()?;
            let mut reload = tokio::time::interval(Duration::from_secs(reload_secs.max(1)));

            loop {
                tokio::select! {
                    _ = reload.tick() => {
                        match load_snapshot(&path) {
                            Ok(snapshot) => handle.apply_snapshot(snapshot)?,
                            Err(e) => tracing::warn!("Could not load {}: {}", path.display(), e),
                        }
                    }
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = updates.borrow_and_update().clone();
                        print_state(&state, false)?;
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            store.unmount();
        }
    }

    Ok(())
}

fn print_state(state: &AgentPanelState, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(state)?
    } else {
        serde_json::to_string(state)?
    };
    println!("{}", json);
    Ok(())
}
