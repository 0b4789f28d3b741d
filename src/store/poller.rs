//! Background inventory polling

use super::Shared;
use crate::config::{EXTENSIONS_POLL_INTERVAL, SKILLS_POLL_INTERVAL};
use crate::inventory::InventoryClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Inventory feeds polled independently of each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feed {
    Extensions,
    Skills,
}

impl Feed {
    pub(crate) fn period(self) -> Duration {
        match self {
            Feed::Extensions => EXTENSIONS_POLL_INTERVAL,
            Feed::Skills => SKILLS_POLL_INTERVAL,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Feed::Extensions => "extensions",
            Feed::Skills => "skills",
        }
    }
}

/// Poll one feed until shutdown.
///
/// The first tick fires immediately. Each fetch is awaited before the next
/// tick, and ticks missed while a slow request was outstanding are skipped,
/// so requests for the same feed never overlap.
pub(crate) async fn run_poller(
    feed: Feed,
    shared: Arc<Shared>,
    client: Arc<dyn InventoryClient>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(feed.period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => break,
        }

        let changed = match feed {
            Feed::Extensions => {
                let result = client.get_extensions().await;
                tracing::debug!(
                    "{} poll via {}: {:?} records",
                    feed.as_str(),
                    client.name(),
                    result.as_ref().map(Vec::len)
                );
                if !shared.is_active() {
                    break;
                }
                let mut sync = shared.lock();
                let changed = sync.apply_extensions(result);
                if changed {
                    shared.publish(&sync);
                }
                changed
            }
            Feed::Skills => {
                let result = client.get_learning_skills().await;
                tracing::debug!(
                    "{} poll via {}: {:?} records",
                    feed.as_str(),
                    client.name(),
                    result.as_ref().map(Vec::len)
                );
                if !shared.is_active() {
                    break;
                }
                let mut sync = shared.lock();
                let changed = sync.apply_skills(result);
                if changed {
                    shared.publish(&sync);
                }
                changed
            }
        };

        if !changed {
            tracing::debug!("No {} data this tick; keeping previous values", feed.as_str());
        }
    }

    tracing::debug!("{} poller stopped", feed.as_str());
}
