//! Utility modules for the coordinator

pub mod error;

pub use error::{CoordinatorError, Result};

use uuid::Uuid;

/// Generate a unique run ID
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
