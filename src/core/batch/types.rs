//! Batch run types and data structures

use crate::core::status::ItemId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One action submitted to the dispatcher on behalf of one item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Item the action targets
    pub target: ItemId,
    /// Operation name, e.g. "delete" or "applyWorkflow"
    pub operation: String,
    /// Operation payload
    pub body: serde_json::Value,
}

impl ActionDescriptor {
    /// Create a descriptor with an empty payload
    pub fn new(target: impl Into<ItemId>, operation: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            operation: operation.into(),
            body: serde_json::Value::Null,
        }
    }

    /// Attach a payload
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = body;
        self
    }
}

/// Failure recorded for one item in a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Item that failed
    pub id: ItemId,
    /// Error detail from the status table or the dispatcher
    pub error: String,
}

/// Per-item completion delivered through the pending-callback channel
pub type ItemResult = std::result::Result<ItemId, ItemFailure>;

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every item resolved without error
    Success,
    /// At least one item failed
    Error,
}

/// Lifecycle phase of the coordinator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run active, no modal shown
    Idle,
    /// Modal shown, waiting for confirm or cancel
    AwaitingConfirmation,
    /// Queue started, callbacks outstanding
    Running,
    /// Aggregate completion observed; outcome fixed until reset
    Settled,
}

/// Aggregate state for one coordinator invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    /// Unique ID, assigned when the run starts
    pub run_id: Option<String>,
    /// Lifecycle phase
    pub phase: RunPhase,
    /// Items submitted in this run
    pub total: usize,
    /// Items whose terminal status has been consumed
    pub completed: usize,
    /// Terminal outcome, set once when the queue drains
    pub outcome: Option<Outcome>,
    /// Whether the confirmation/progress modal is visible
    pub modal_visible: bool,
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,
    /// Selection the run operates on
    pub selection: Vec<ItemId>,
}

impl BatchRun {
    /// The state between runs
    pub fn idle() -> Self {
        Self {
            run_id: None,
            phase: RunPhase::Idle,
            total: 0,
            completed: 0,
            outcome: None,
            modal_visible: false,
            started_at: None,
            selection: Vec::new(),
        }
    }

    /// Share of the run consumed so far, as a 0-100 percentage
    pub fn progress_percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f32) * 100.0 / (self.total as f32)
    }
}

impl Default for BatchRun {
    fn default() -> Self {
        Self::idle()
    }
}

/// Combine per-item failures into the single message surfaced to callers
///
/// Returns `None` when no failures occurred.
pub fn combine_errors(errors: &[ItemFailure]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let details: Vec<&str> = errors.iter().map(|e| e.error.as_str()).collect();
    Some(format!(
        "{} error(s) occurred: \n{}",
        errors.len(),
        details.join("\n")
    ))
}
