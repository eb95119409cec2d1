//! A planner bound to its storage.
//!
//! `Session` loads the task collection once, routes every action through the
//! planner, and writes the collection back whenever an action changed it.

use tracing::{info, warn};

use crate::planner::{Action, Change, Planner};
use crate::store::{PersistentStore, Storage};
use crate::task::Task;

pub struct Session<S: Storage> {
    store: PersistentStore<S>,
    key: String,
    pub planner: Planner,
}

impl<S: Storage> Session<S> {
    /// Load the collection stored under `key`; an absent or unreadable value is an empty list.
    pub fn open(storage: S, key: &str) -> Self {
        let store = PersistentStore::new(storage);
        let tasks: Vec<Task> = store.load(key, Vec::new());
        info!(key, count = tasks.len(), "loaded tasks");
        Session { store, key: key.to_string(), planner: Planner::new(tasks) }
    }

    #[cfg(test)]
    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    /// Dispatch to the planner, saving if the collection changed.
    pub fn dispatch(&mut self, action: Action) -> Change {
        let change = self.planner.dispatch(action);
        if change.needs_save() {
            self.persist();
        }
        change
    }

    /// Drop the stored collection and start over with an empty planner.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.store.clear(&self.key)?;
        self.planner = Planner::default();
        info!(key = %self.key, "cleared all tasks");
        Ok(())
    }

    /// Best-effort write of the collection. Failures are logged, not returned.
    pub fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.key, &self.planner.tasks) {
            warn!(key = %self.key, error = %e, "could not persist tasks");
        }
    }
}
