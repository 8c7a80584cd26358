//! # BatchOps-RS
//!
//! Batch command coordination for pipeline operations dashboards: fan a bulk
//! action out over selected items with bounded concurrency, reconcile
//! completion against an externally-mutated status table, and surface one
//! aggregate outcome per run.
//!
//! ## Features
//!
//! - **Bounded fan-out**: per-item dispatches run through a worker queue with
//!   a fixed concurrency limit (3 by default)
//! - **Status reconciliation**: completion is observed by watching status
//!   snapshots published by the application's request layer, not by return
//!   values
//! - **One aggregate outcome**: per-item failures are collected and surfaced
//!   once, in a single combined message, after every item has resolved
//! - **Headless UI lifecycle**: confirmation, progress, and settle state
//!   exposed as a render model rather than a widget binding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batchops_rs::{BatchCoordinator, CoordinatorConfig, StatusBoard, commands};
//! use std::sync::Arc;
//!
//! # async fn example(dispatcher: Arc<dyn batchops_rs::Dispatcher>) {
//! let board = Arc::new(StatusBoard::new());
//!
//! let coordinator = BatchCoordinator::builder(dispatcher, commands::delete_item)
//!     .config(CoordinatorConfig::new().with_concurrency(3))
//!     .confirm_prompt(|n| format!("Delete {} collection(s)?", n))
//!     .on_error(|combined| eprintln!("{}", combined))
//!     .build();
//!
//! // reconcile whenever the request layer moves the status table
//! let _watcher = coordinator.watch(board.subscribe());
//!
//! let selection = vec!["collection-a".to_string(), "collection-b".to_string()];
//! coordinator.trigger(&selection).await;
//! coordinator.confirm().await;
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{Settings, settings};
pub use utils::error::{CoordinatorError, Result};

// Export the batch machinery
pub use core::batch::{
    ActionDescriptor, BatchCoordinator, BatchRun, CoordinatorBuilder, CoordinatorConfig,
    DEFAULT_CONCURRENCY, Dispatcher, ERROR_LABEL, IN_PROGRESS_LABEL, ItemFailure, ItemResult,
    ModalContent, ModalSnapshot, Outcome, QueueReport, RunPhase, SUCCESS_LABEL, WorkerQueue,
    combine_errors, run_batch,
};

// Export the status table surface
pub use core::status::{ItemId, ItemStatus, StatusBoard, StatusEntry, StatusSnapshot};

// Export prebuilt pipeline actions
pub use core::commands;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
