//! Core BatchCoordinator struct, collaborator contracts, and builder

use crate::config;
use crate::core::batch::types::{ActionDescriptor, BatchRun, ItemResult};
use crate::core::batch::view::{self, ModalContent, ModalSnapshot};
use crate::core::status::ItemId;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::sync::{RwLock, oneshot};

/// Submits one action to the backing API on behalf of the coordinator
///
/// The dispatcher's side effects are what eventually move the status table;
/// the coordinator itself never talks to the network.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Submit one action; resolves once the request has been accepted
    async fn dispatch(&self, action: ActionDescriptor) -> Result<serde_json::Value>;
}

/// Produces the per-item action for a run
pub type ActionFactory = Arc<dyn Fn(&ItemId) -> ActionDescriptor + Send + Sync>;

/// Invoked once per settled run that produced any successful result
pub type SuccessCallback = Arc<dyn Fn(&[ItemId], Option<&str>) + Send + Sync>;

/// Invoked once per settled run that produced any failure
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Builds the confirmation prompt shown for a pending selection
pub type ConfirmPrompt = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Supplies a custom modal body for the current selection, if any
pub type ModalOptionsProvider = Arc<dyn Fn(&[ItemId]) -> Option<ModalContent> + Send + Sync>;

/// Tunables for one coordinator instance
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Fan-out width for per-item dispatches
    pub concurrency: usize,
    /// How long a settled run stays visible before resetting
    pub update_delay: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        let settings = config::settings();
        Self {
            concurrency: settings.concurrency,
            update_delay: settings.update_delay(),
        }
    }
}

impl CoordinatorConfig {
    /// Create a config from the crate-level settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fan-out width (clamped to at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the settle-to-reset delay
    pub fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }
}

/// Coordinates one bulk command at a time over a set of selected items
///
/// One dispatched action per item flows through a bounded worker queue;
/// completion is observed by reconciling against status snapshots the
/// request layer publishes.
pub struct BatchCoordinator {
    pub(super) config: CoordinatorConfig,
    pub(super) dispatcher: Arc<dyn Dispatcher>,
    pub(super) action: ActionFactory,
    pub(super) on_success: Option<SuccessCallback>,
    pub(super) on_error: Option<ErrorCallback>,
    pub(super) confirm_prompt: Option<ConfirmPrompt>,
    pub(super) confirm_options: Vec<String>,
    pub(super) modal_options: Option<ModalOptionsProvider>,
    /// Pending one-shot completion handles, one per in-flight item
    pub(super) pending: Arc<RwLock<HashMap<ItemId, oneshot::Sender<ItemResult>>>>,
    /// Run-scoped aggregate state
    pub(super) run: Arc<RwLock<BatchRun>>,
    /// Custom modal body recorded by `confirm`
    pub(super) custom_modal: Arc<RwLock<Option<ModalContent>>>,
    /// Single-flight guard around the reconciliation pass
    pub(super) reconciling: Arc<AtomicBool>,
}

impl BatchCoordinator {
    /// Start building a coordinator around its two required collaborators
    pub fn builder(
        dispatcher: Arc<dyn Dispatcher>,
        action: impl Fn(&ItemId) -> ActionDescriptor + Send + Sync + 'static,
    ) -> CoordinatorBuilder {
        CoordinatorBuilder {
            config: CoordinatorConfig::default(),
            dispatcher,
            action: Arc::new(action),
            on_success: None,
            on_error: None,
            confirm_prompt: None,
            confirm_options: Vec::new(),
            modal_options: None,
        }
    }

    /// Instance configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Snapshot of the current run state
    pub async fn run(&self) -> BatchRun {
        self.run.read().await.clone()
    }

    /// Whether any per-item callback is outstanding
    pub async fn is_inflight(&self) -> bool {
        !self.pending.read().await.is_empty()
    }

    /// Render model for the modal and trigger control
    pub async fn modal_snapshot(&self) -> ModalSnapshot {
        let run = self.run.read().await.clone();
        let inflight = self.is_inflight().await;
        let prompt = self
            .confirm_prompt
            .as_ref()
            .map(|prompt| prompt(run.selection.len()));
        let custom = self.custom_modal.read().await.clone();
        view::modal_snapshot(&run, inflight, prompt, &self.confirm_options, custom)
    }
}

impl Clone for BatchCoordinator {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            dispatcher: self.dispatcher.clone(),
            action: self.action.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            confirm_prompt: self.confirm_prompt.clone(),
            confirm_options: self.confirm_options.clone(),
            modal_options: self.modal_options.clone(),
            pending: self.pending.clone(),
            run: self.run.clone(),
            custom_modal: self.custom_modal.clone(),
            reconciling: self.reconciling.clone(),
        }
    }
}

/// Builder for [`BatchCoordinator`]
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
    dispatcher: Arc<dyn Dispatcher>,
    action: ActionFactory,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    confirm_prompt: Option<ConfirmPrompt>,
    confirm_options: Vec<String>,
    modal_options: Option<ModalOptionsProvider>,
}

impl CoordinatorBuilder {
    /// Override the instance configuration
    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Callback fired once per settled run that produced any result
    pub fn on_success(
        mut self,
        callback: impl Fn(&[ItemId], Option<&str>) + Send + Sync + 'static,
    ) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Callback fired once per settled run that produced any failure
    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Require explicit confirmation, with a prompt built from the selection size
    pub fn confirm_prompt(
        mut self,
        prompt: impl Fn(usize) -> String + Send + Sync + 'static,
    ) -> Self {
        self.confirm_prompt = Some(Arc::new(prompt));
        self
    }

    /// Extra lines shown in the default confirmation body
    pub fn confirm_options(mut self, options: Vec<String>) -> Self {
        self.confirm_options = options;
        self
    }

    /// Provider that can swap in a custom modal body for a selection
    pub fn modal_options(
        mut self,
        provider: impl Fn(&[ItemId]) -> Option<ModalContent> + Send + Sync + 'static,
    ) -> Self {
        self.modal_options = Some(Arc::new(provider));
        self
    }

    /// Build the coordinator
    pub fn build(self) -> BatchCoordinator {
        BatchCoordinator {
            config: self.config,
            dispatcher: self.dispatcher,
            action: self.action,
            on_success: self.on_success,
            on_error: self.on_error,
            confirm_prompt: self.confirm_prompt,
            confirm_options: self.confirm_options,
            modal_options: self.modal_options,
            pending: Arc::new(RwLock::new(HashMap::new())),
            run: Arc::new(RwLock::new(BatchRun::idle())),
            custom_modal: Arc::new(RwLock::new(None)),
            reconciling: Arc::new(AtomicBool::new(false)),
        }
    }
}
