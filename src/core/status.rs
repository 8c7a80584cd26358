//! Item status tracking shared between the request layer and the coordinator
//!
//! The application's request layer owns these entries and marks them as its
//! calls resolve; the coordinator only reads snapshots delivered over a watch
//! channel.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::watch;

/// Identifier of one unit of batch work
pub type ItemId = String;

/// Point-in-time view of the status table
pub type StatusSnapshot = HashMap<ItemId, StatusEntry>;

/// Status of one asynchronous per-item operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Operation dispatched, not yet resolved
    Pending,
    /// Operation resolved successfully
    Success,
    /// Operation failed
    Error,
}

/// One entry in the status table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Current status
    pub status: ItemStatus,
    /// Error detail when status is `Error`
    pub error: Option<String>,
}

impl StatusEntry {
    /// Entry for an operation that has been dispatched but not resolved
    pub fn pending() -> Self {
        Self {
            status: ItemStatus::Pending,
            error: None,
        }
    }

    /// Entry for a successfully resolved operation
    pub fn success() -> Self {
        Self {
            status: ItemStatus::Success,
            error: None,
        }
    }

    /// Entry for a failed operation
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ItemStatus::Error,
            error: Some(message.into()),
        }
    }

    /// Whether the operation has resolved, one way or the other
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ItemStatus::Success | ItemStatus::Error)
    }
}

/// Publisher for the status table
///
/// Every mutation publishes a fresh snapshot to all subscribers, so a
/// coordinator watching the channel reconciles as soon as an entry turns
/// terminal.
#[derive(Debug)]
pub struct StatusBoard {
    entries: RwLock<StatusSnapshot>,
    tx: watch::Sender<StatusSnapshot>,
}

impl StatusBoard {
    /// Create an empty board
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::new());
        Self {
            entries: RwLock::new(StatusSnapshot::new()),
            tx,
        }
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    /// Mark an item's operation as dispatched
    pub fn mark_pending(&self, id: impl Into<ItemId>) {
        self.insert(id.into(), StatusEntry::pending());
    }

    /// Mark an item's operation as resolved successfully
    pub fn mark_success(&self, id: impl Into<ItemId>) {
        self.insert(id.into(), StatusEntry::success());
    }

    /// Mark an item's operation as failed
    pub fn mark_error(&self, id: impl Into<ItemId>, message: impl Into<String>) {
        self.insert(id.into(), StatusEntry::error(message));
    }

    /// Current snapshot of the table
    pub fn snapshot(&self) -> StatusSnapshot {
        self.entries.read().clone()
    }

    /// Drop all entries, publishing the empty snapshot
    pub fn clear(&self) {
        let snapshot = {
            let mut entries = self.entries.write();
            entries.clear();
            entries.clone()
        };
        let _ = self.tx.send(snapshot);
    }

    fn insert(&self, id: ItemId, entry: StatusEntry) {
        let snapshot = {
            let mut entries = self.entries.write();
            entries.insert(id, entry);
            entries.clone()
        };
        let _ = self.tx.send(snapshot);
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
