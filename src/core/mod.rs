//! Core functionality for the coordinator
//!
//! This module contains the batch machinery and the data structures shared
//! with the embedding application.

pub mod batch;
pub mod commands;
pub mod status;
