//! The batch command coordinator
//!
//! Split into logical components:
//! - `core`: coordinator struct, collaborator contracts, and builder
//! - `lifecycle`: trigger/confirm/cancel/start and the settle-reset flow
//! - `reconcile`: status-snapshot reconciliation and the watch subscription

pub mod core;
mod lifecycle;
mod reconcile;

pub use core::{
    ActionFactory, BatchCoordinator, ConfirmPrompt, CoordinatorBuilder, CoordinatorConfig,
    Dispatcher, ErrorCallback, ModalOptionsProvider, SuccessCallback,
};
