//! Headless modal and trigger view-model
//!
//! What the confirmation/progress modal shows, computed from run state
//! without binding to any widget toolkit. Embedders render this however
//! they like.

use super::types::{BatchRun, Outcome};
use serde::{Deserialize, Serialize};

/// Modal title while callbacks are outstanding
pub const IN_PROGRESS_LABEL: &str = "Processing...";
/// Modal title once a run settles with no failures
pub const SUCCESS_LABEL: &str = "Success!";
/// Modal title once a run settles with at least one failure
pub const ERROR_LABEL: &str = "Error";

/// Body of the confirmation/progress modal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModalContent {
    /// Default confirmation body with a progress bar
    Progress,
    /// Caller-supplied body, rendered instead of the default view
    Custom(serde_json::Value),
}

impl ModalContent {
    /// Whether a caller-supplied body replaces the default view
    pub fn is_custom(&self) -> bool {
        matches!(self, ModalContent::Custom(_))
    }
}

/// Point-in-time render model for the modal and its trigger control
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModalSnapshot {
    /// Modal title: confirmation prompt, progress label, or terminal label
    pub title: String,
    /// Whether the modal is on screen
    pub visible: bool,
    /// 0-100 progress across the current run
    pub progress_percent: f32,
    /// Whether the confirm/cancel controls are greyed out
    pub controls_disabled: bool,
    /// Whether the trigger control is greyed out
    pub trigger_disabled: bool,
    /// Extra confirmation lines shown in the default body
    pub confirm_options: Vec<String>,
    /// Selected body
    pub content: ModalContent,
}

/// Compute the render model for a run
pub(crate) fn modal_snapshot(
    run: &BatchRun,
    inflight: bool,
    prompt: Option<String>,
    confirm_options: &[String],
    custom: Option<ModalContent>,
) -> ModalSnapshot {
    let title = if inflight {
        IN_PROGRESS_LABEL.to_string()
    } else {
        match run.outcome {
            None => prompt.unwrap_or_default(),
            Some(Outcome::Success) => SUCCESS_LABEL.to_string(),
            Some(Outcome::Error) => ERROR_LABEL.to_string(),
        }
    };

    // controls grey out while loading and during the settle-to-reset hold
    let settled = run.outcome.is_some();

    ModalSnapshot {
        title,
        visible: run.modal_visible,
        progress_percent: run.progress_percent(),
        controls_disabled: inflight || settled,
        trigger_disabled: !run.modal_visible && (run.selection.is_empty() || inflight),
        confirm_options: confirm_options.to_vec(),
        content: custom.unwrap_or(ModalContent::Progress),
    }
}
