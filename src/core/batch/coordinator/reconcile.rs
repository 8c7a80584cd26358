//! Reconciliation of pending callbacks against status snapshots

use super::core::BatchCoordinator;
use crate::core::batch::types::ItemFailure;
use crate::core::status::{ItemId, ItemStatus, StatusSnapshot};
use std::sync::atomic::Ordering;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

impl BatchCoordinator {
    /// Consume terminal statuses for items with outstanding callbacks
    ///
    /// Each callback is invoked and removed at most once; `completed` moves
    /// by exactly the number of callbacks consumed. A single-flight guard
    /// drops redundant passes during update storms instead of letting them
    /// double-consume.
    pub async fn reconcile(&self, snapshot: &StatusSnapshot) {
        if self
            .reconciling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let mut consumed = 0usize;
        {
            let mut pending = self.pending.write().await;
            let ids: Vec<ItemId> = pending.keys().cloned().collect();
            for id in ids {
                let Some(entry) = snapshot.get(&id) else {
                    continue;
                };
                let result = match entry.status {
                    ItemStatus::Pending => continue,
                    ItemStatus::Success => Ok(id.clone()),
                    ItemStatus::Error => Err(ItemFailure {
                        id: id.clone(),
                        error: entry
                            .error
                            .clone()
                            .unwrap_or_else(|| "unknown error".to_string()),
                    }),
                };
                if let Some(tx) = pending.remove(&id) {
                    debug!(item = %id, status = ?entry.status, "consumed terminal status");
                    let _ = tx.send(result);
                    consumed += 1;
                }
            }
        }

        if consumed > 0 {
            self.run.write().await.completed += consumed;
        }

        self.reconciling.store(false, Ordering::Release);
    }

    /// Spawn a task that reconciles on every status-table update
    ///
    /// The snapshot present at subscription time is consumed first, then one
    /// pass per published change until the board is dropped.
    pub fn watch(&self, mut rx: watch::Receiver<StatusSnapshot>) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            loop {
                let snapshot = rx.borrow_and_update().clone();
                coordinator.reconcile(&snapshot).await;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
