//! Prebuilt action descriptors for the pipeline operations exposed in bulk
//!
//! Pure descriptor builders; the injected dispatcher decides what submitting
//! one of these actually means.

use crate::core::batch::ActionDescriptor;
use crate::core::status::ItemId;
use serde_json::json;

/// Delete one item
pub fn delete_item(id: &ItemId) -> ActionDescriptor {
    ActionDescriptor::new(id.clone(), "delete")
}

/// Re-ingest one item from its original source
pub fn reingest(id: &ItemId) -> ActionDescriptor {
    ActionDescriptor::new(id.clone(), "reingest")
}

/// Remove one item from the public archive without deleting it
pub fn remove_from_archive(id: &ItemId) -> ActionDescriptor {
    ActionDescriptor::new(id.clone(), "removeFromArchive")
}

/// Apply a named workflow to one item
pub fn apply_workflow(id: &ItemId, workflow: &str) -> ActionDescriptor {
    ActionDescriptor::new(id.clone(), "applyWorkflow").with_body(json!({ "workflow": workflow }))
}

/// Action factory applying `workflow` to every item in a run
pub fn apply_workflow_factory(
    workflow: impl Into<String>,
) -> impl Fn(&ItemId) -> ActionDescriptor + Send + Sync + 'static {
    let workflow = workflow.into();
    move |id| apply_workflow(id, &workflow)
}
