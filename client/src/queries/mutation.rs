//! Mutation keys and in-flight tracking

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Update,
    Create,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Update => "update",
            Action::Create => "create",
            Action::Delete => "delete",
        }
    }
}

/// `(collection, action, id)`; creates have no id yet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationKey {
    pub collection: &'static str,
    pub action: Action,
    pub id: Option<String>,
}

impl MutationKey {
    pub fn new(collection: &'static str, action: Action, id: &str) -> Self {
        Self {
            collection,
            action,
            id: Some(id.to_string()),
        }
    }

    pub fn create(collection: &'static str) -> Self {
        Self {
            collection,
            action: Action::Create,
            id: None,
        }
    }
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {} {}", self.action.as_str(), self.collection, id),
            None => write!(f, "{} {}", self.action.as_str(), self.collection),
        }
    }
}

/// Mutations currently in flight, counted per key
#[derive(Debug, Default)]
pub struct MutationTracker {
    pending: Mutex<HashMap<MutationKey, usize>>,
}

impl MutationTracker {
    /// Mark `key` pending until every guard returned for it drops
    pub fn begin(&self, key: MutationKey) -> PendingMutation<'_> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *pending.entry(key.clone()).or_insert(0) += 1;
        PendingMutation { tracker: self, key }
    }

    pub fn is_pending(&self, key: &MutationKey) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.contains_key(key)
    }
}

pub struct PendingMutation<'a> {
    tracker: &'a MutationTracker,
    key: MutationKey,
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        let mut pending = self
            .tracker
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(count) = pending.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                pending.remove(&self.key);
            }
        }
    }
}
