//! Run lifecycle: trigger, confirm, cancel, start, settle, reset

use super::core::BatchCoordinator;
use crate::core::batch::queue::{QueueReport, WorkerQueue};
use crate::core::batch::types::{BatchRun, ItemFailure, Outcome, RunPhase, combine_errors};
use crate::core::status::ItemId;
use crate::utils::generate_run_id;
use chrono::Utc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

impl BatchCoordinator {
    /// Handle the trigger control being activated for `selection`
    ///
    /// With a confirmation prompt configured the modal opens first; otherwise
    /// the run starts immediately. Ignored while a run is inflight.
    pub async fn trigger(&self, selection: &[ItemId]) -> bool {
        if self.is_inflight().await {
            warn!("trigger ignored: run already inflight");
            return false;
        }

        if self.confirm_prompt.is_none() {
            return self.start(selection).await;
        }

        {
            let mut run = self.run.write().await;
            if run.phase == RunPhase::Running || run.phase == RunPhase::Settled {
                return false;
            }
            run.phase = RunPhase::AwaitingConfirmation;
            run.modal_visible = true;
            run.completed = 0;
            run.outcome = None;
            run.selection = selection.to_vec();
        }
        debug!(total = selection.len(), "awaiting confirmation");
        true
    }

    /// Accept the confirmation modal
    ///
    /// A configured modal-options provider can swap in a custom body for the
    /// current selection instead of starting the run; the run is then driven
    /// from that custom flow, not from here.
    pub async fn confirm(&self) -> bool {
        let selection = { self.run.read().await.selection.clone() };

        if let Some(provider) = &self.modal_options {
            if let Some(content) = provider(&selection) {
                *self.custom_modal.write().await = Some(content);
                debug!("custom modal content supplied; run not started");
                return false;
            }
        }

        if self.is_inflight().await {
            return false;
        }
        self.start(&selection).await
    }

    /// Dismiss the confirmation modal
    ///
    /// Refused while any per-item callback is outstanding, so an inflight run
    /// is never silently abandoned.
    pub async fn cancel(&self) -> bool {
        if self.is_inflight().await {
            warn!("cancel refused: callbacks outstanding");
            return false;
        }

        {
            let mut run = self.run.write().await;
            run.modal_visible = false;
            if run.phase == RunPhase::AwaitingConfirmation {
                run.phase = RunPhase::Idle;
            }
        }
        *self.custom_modal.write().await = None;
        true
    }

    /// Begin a run over `selection`
    ///
    /// Returns `false` without touching any state when the selection is empty,
    /// a previous run still has callbacks outstanding, or a settled run is
    /// still on screen.
    pub async fn start(&self, selection: &[ItemId]) -> bool {
        if selection.is_empty() {
            warn!("start rejected: empty selection");
            return false;
        }

        let run_id = generate_run_id();
        {
            let mut run = self.run.write().await;
            if run.phase == RunPhase::Running || run.phase == RunPhase::Settled {
                warn!("start rejected: run already inflight");
                return false;
            }
            if !self.pending.read().await.is_empty() {
                warn!("start rejected: callbacks outstanding");
                return false;
            }
            run.run_id = Some(run_id.clone());
            run.phase = RunPhase::Running;
            run.total = selection.len();
            run.completed = 0;
            run.outcome = None;
            run.selection = selection.to_vec();
            run.started_at = Some(Utc::now());
        }
        info!(run_id = %run_id, total = selection.len(), "starting batch run");

        let mut queue: WorkerQueue<ItemId, ItemFailure> =
            WorkerQueue::new(self.config.concurrency);

        for id in selection {
            let rx = self.register(id.clone()).await;
            let dispatcher = self.dispatcher.clone();
            let action = (self.action)(id);
            let pending = self.pending.clone();
            let run = self.run.clone();
            let id = id.clone();

            queue.add(async move {
                if let Err(err) = dispatcher.dispatch(action).await {
                    // the request never left; record the failure ourselves,
                    // unless reconciliation already consumed the callback
                    let removed = pending.write().await.remove(&id).is_some();
                    if removed {
                        run.write().await.completed += 1;
                        return Err(ItemFailure {
                            id,
                            error: err.to_string(),
                        });
                    }
                    return match rx.await {
                        Ok(result) => result,
                        Err(_) => Err(ItemFailure {
                            id,
                            error: err.to_string(),
                        }),
                    };
                }

                match rx.await {
                    Ok(result) => result,
                    Err(_) => Err(ItemFailure {
                        id,
                        error: "completion channel closed".to_string(),
                    }),
                }
            });
        }

        let coordinator = self.clone();
        tokio::spawn(async move {
            let report = queue.drain().await;
            coordinator.settle(report).await;
        });

        true
    }

    /// Register the pending callback for one item
    pub(super) async fn register(&self, id: ItemId) -> oneshot::Receiver<crate::core::batch::types::ItemResult> {
        let (tx, rx) = oneshot::channel();
        self.pending.write().await.insert(id, tx);
        rx
    }

    /// Queue drained: fix the outcome, hold it for the configured delay, reset
    pub(super) async fn settle(&self, report: QueueReport<ItemId, ItemFailure>) {
        let combined = combine_errors(&report.errors);
        let outcome = if combined.is_some() {
            Outcome::Error
        } else {
            Outcome::Success
        };

        {
            let mut run = self.run.write().await;
            run.outcome = Some(outcome);
            run.phase = RunPhase::Settled;
        }
        info!(
            ?outcome,
            errors = report.errors.len(),
            results = report.results.len(),
            "batch run settled"
        );

        tokio::time::sleep(self.config.update_delay).await;
        self.cleanup(combined, report.results).await;
    }

    /// Reset run-scoped state and fire the caller's callbacks
    ///
    /// Both callbacks can fire for the same run: `on_error` whenever any item
    /// failed, and `on_success` whenever any item got through, carrying the
    /// combined error alongside the surviving results.
    pub(super) async fn cleanup(&self, error: Option<String>, results: Vec<ItemId>) {
        {
            let mut run = self.run.write().await;
            *run = BatchRun::idle();
        }
        *self.custom_modal.write().await = None;

        if let Some(error) = &error {
            if let Some(on_error) = &self.on_error {
                on_error(error);
            }
        }
        if !results.is_empty() {
            if let Some(on_success) = &self.on_success {
                on_success(&results, error.as_deref());
            }
        }
    }
}
