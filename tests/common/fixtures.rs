//! Test fixtures and dispatcher doubles

use async_trait::async_trait;
use batchops_rs::{ActionDescriptor, CoordinatorError, Dispatcher, Result, StatusBoard};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Build a selection from string literals
pub fn selection(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Dispatcher double that drives a [`StatusBoard`] the way the request layer
/// would: accept the action, mark the item pending, and resolve it a little
/// later from a background task.
pub struct BoardDispatcher {
    board: Arc<StatusBoard>,
    dispatched: Mutex<Vec<ActionDescriptor>>,
    failures: HashMap<String, String>,
    latency: Duration,
}

impl BoardDispatcher {
    /// Dispatcher resolving every item successfully after a short delay
    pub fn new(board: Arc<StatusBoard>) -> Self {
        Self {
            board,
            dispatched: Mutex::new(Vec::new()),
            failures: HashMap::new(),
            latency: Duration::from_millis(10),
        }
    }

    /// Make one item resolve with an error instead
    pub fn failing(mut self, id: &str, message: &str) -> Self {
        self.failures.insert(id.to_string(), message.to_string());
        self
    }

    /// Change how long resolution takes
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Actions accepted so far
    pub fn dispatched(&self) -> Vec<ActionDescriptor> {
        self.dispatched.lock().clone()
    }

    /// Number of actions accepted so far
    pub fn dispatched_count(&self) -> usize {
        self.dispatched.lock().len()
    }
}

#[async_trait]
impl Dispatcher for BoardDispatcher {
    async fn dispatch(&self, action: ActionDescriptor) -> Result<serde_json::Value> {
        let target = action.target.clone();
        self.dispatched.lock().push(action);
        self.board.mark_pending(target.clone());

        let board = self.board.clone();
        let failure = self.failures.get(&target).cloned();
        let latency = self.latency;
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            match failure {
                Some(message) => board.mark_error(target, message),
                None => board.mark_success(target),
            }
        });

        Ok(serde_json::json!({ "accepted": true }))
    }
}

/// Dispatcher double whose submission itself fails for every item
pub struct RejectingDispatcher {
    message: String,
}

impl RejectingDispatcher {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Dispatcher for RejectingDispatcher {
    async fn dispatch(&self, _action: ActionDescriptor) -> Result<serde_json::Value> {
        Err(CoordinatorError::dispatch(self.message.clone()))
    }
}
