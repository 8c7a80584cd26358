//! Batch command coordination
//!
//! One dispatched action per selected item, fanned out through a bounded
//! worker queue, with completion reconciled against the externally-mutated
//! status table.

mod coordinator;
mod queue;
mod types;
mod view;


// Re-export all public types
pub use coordinator::{
    ActionFactory, BatchCoordinator, ConfirmPrompt, CoordinatorBuilder, CoordinatorConfig,
    Dispatcher, ErrorCallback, ModalOptionsProvider, SuccessCallback,
};
pub use queue::{DEFAULT_CONCURRENCY, QueueReport, WorkerQueue, run_batch};
pub use types::{
    ActionDescriptor, BatchRun, ItemFailure, ItemResult, Outcome, RunPhase, combine_errors,
};
pub use view::{ERROR_LABEL, IN_PROGRESS_LABEL, ModalContent, ModalSnapshot, SUCCESS_LABEL};
