//! Panel store - the synchronizer
//!
//! Owns the consolidated panel state for one mounted panel tree. Stream
//! snapshots are folded in synchronously; inventory arrives from two
//! independent poll loops. Every change publishes a complete new state.
//!
//! # Architecture
//!
//! ```text
//! StreamSnapshot ──apply_snapshot──┐
//!                                  ▼
//!   extensions poller (30s) ──► SyncState ──publish──► watch<Arc<AgentPanelState>>
//!   skills poller     (60s) ──►    ▲                         │
//!                                  │                         ▼
//!              PanelHandle mutations (set_mode, update_task, ...)   consumers
//! ```
//!
//! A [`PanelHandle`] is only usable while its [`PanelStore`] is mounted.
//! After unmount every call fails with [`PanelError::NoActiveStore`].

mod poller;
mod sync;

use crate::config::SyncConfig;
use crate::inventory::InventoryClient;
use crate::model::{
    AgentPanelState, AgentPatch, ChatMessage, FileActivity, PanelMode, TaskId, TaskPatch, ToolCall,
};
use crate::stream::StreamSnapshot;
use crate::{PanelError, Result};
use poller::{Feed, run_poller};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use sync::SyncState;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Name reported when the store is used outside its lifetime
const PROVIDER_NAME: &str = "PanelStore";

/// State shared between the store, its handles and the pollers
pub(crate) struct Shared {
    config: SyncConfig,
    active: AtomicBool,
    sync: Mutex<SyncState>,
    published: watch::Sender<Arc<AgentPanelState>>,
}

impl Shared {
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.sync.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the current state. Called with the lock held so publication
    /// order matches mutation order.
    pub(crate) fn publish(&self, sync: &SyncState) {
        self.published.send_replace(Arc::new(sync.state.clone()));
    }
}

/// A mounted synchronizer.
///
/// Must be mounted from within a Tokio runtime. Dropping the store unmounts
/// it: both pollers are cancelled and outstanding handles stop working.
pub struct PanelStore {
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    pollers: Vec<JoinHandle<()>>,
}

impl PanelStore {
    /// Mount a store and start polling `client` immediately
    pub fn mount<C>(config: SyncConfig, client: C) -> Self
    where
        C: InventoryClient + 'static,
    {
        let sync = SyncState::new(&config);
        let (published, _) = watch::channel(Arc::new(sync.state.clone()));
        let shared = Arc::new(Shared {
            config,
            active: AtomicBool::new(true),
            sync: Mutex::new(sync),
            published,
        });

        let client: Arc<dyn InventoryClient> = Arc::new(client);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let pollers = [Feed::Extensions, Feed::Skills]
            .into_iter()
            .map(|feed| {
                tokio::spawn(run_poller(
                    feed,
                    shared.clone(),
                    client.clone(),
                    shutdown_rx.clone(),
                ))
            })
            .collect();

        tracing::info!("Panel store mounted (inventory via {})", client.name());

        Self {
            shared,
            shutdown,
            pollers,
        }
    }

    /// Get a handle for consumers
    pub fn handle(&self) -> PanelHandle {
        PanelHandle {
            shared: self.shared.clone(),
        }
    }

    /// Current published state
    pub fn state(&self) -> Arc<AgentPanelState> {
        self.shared.published.borrow().clone()
    }

    /// Fold a new stream snapshot into the state
    pub fn apply_snapshot(&self, snapshot: StreamSnapshot) {
        let mut sync = self.shared.lock();
        if sync.apply_snapshot(snapshot, &self.shared.config) {
            self.shared.publish(&sync);
        }
    }

    /// Tear the store down. Equivalent to dropping it.
    pub fn unmount(self) {}

    fn teardown(&mut self) {
        if !self.shared.active.swap(false, Ordering::AcqRel) {
            return;
        }
        let _ = self.shutdown.send(true);
        for poller in self.pollers.drain(..) {
            poller.abort();
        }
        tracing::info!("Panel store unmounted");
    }
}

impl Drop for PanelStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Consumer access to a mounted store: reads and the mutation API.
///
/// Cheap to clone. Every method fails with [`PanelError::NoActiveStore`] once
/// the store is gone.
#[derive(Clone)]
pub struct PanelHandle {
    shared: Arc<Shared>,
}

impl PanelHandle {
    fn shared(&self) -> Result<&Shared> {
        if self.shared.is_active() {
            Ok(&self.shared)
        } else {
            Err(PanelError::NoActiveStore(PROVIDER_NAME))
        }
    }

    /// Run `f` against the state and publish the result
    fn mutate<R>(&self, f: impl FnOnce(&mut SyncState, &SyncConfig) -> Result<R>) -> Result<R> {
        let shared = self.shared()?;
        let mut sync = shared.lock();
        let out = f(&mut *sync, &shared.config)?;
        shared.publish(&sync);
        Ok(out)
    }

    /// Current published state
    pub fn state(&self) -> Result<Arc<AgentPanelState>> {
        Ok(self.shared()?.published.borrow().clone())
    }

    /// Watch for published states
    pub fn subscribe(&self) -> Result<watch::Receiver<Arc<AgentPanelState>>> {
        Ok(self.shared()?.published.subscribe())
    }

    /// Fold a new stream snapshot into the state
    pub fn apply_snapshot(&self, snapshot: StreamSnapshot) -> Result<()> {
        let shared = self.shared()?;
        let mut sync = shared.lock();
        if sync.apply_snapshot(snapshot, &shared.config) {
            shared.publish(&sync);
        }
        Ok(())
    }

    pub fn set_mode(&self, mode: PanelMode) -> Result<()> {
        self.mutate(|sync, _| {
            sync.set_mode(mode);
            Ok(())
        })
    }

    /// Patch an agent node anywhere in the tree.
    ///
    /// The patch lasts until the next snapshot re-derives the tree.
    pub fn update_agent(&self, id: &str, patch: AgentPatch) -> Result<()> {
        self.mutate(|sync, _| sync.update_agent(id, &patch))
    }

    pub fn add_tool_call(&self, call: ToolCall) -> Result<()> {
        self.mutate(|sync, _| {
            sync.add_tool_call(call);
            Ok(())
        })
    }

    pub fn add_file_activity(&self, activity: FileActivity) -> Result<()> {
        self.mutate(|sync, config| {
            sync.add_file_activity(activity, config);
            Ok(())
        })
    }

    pub fn add_message(&self, message: ChatMessage) -> Result<()> {
        self.mutate(|sync, _| {
            sync.add_message(message);
            Ok(())
        })
    }

    /// Install or extend the manual override for a task.
    ///
    /// The override is re-applied on top of every later derivation until the
    /// task disappears from the stream.
    pub fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<()> {
        self.mutate(|sync, config| {
            sync.update_task(id, patch, config);
            Ok(())
        })
    }
}
