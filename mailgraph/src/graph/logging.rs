//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start, node execution, synthetic faults and run
//! completion. Every event carries the run id.

use crate::error::RunFault;

/// Log run start.
pub fn log_run_start(run_id: &str, item_id: &str, entry: &str) {
    tracing::info!(run_id, item_id, entry, "Starting graph run");
}

/// Log node execution start.
pub fn log_node_start(run_id: &str, node_id: &str, iteration: usize) {
    tracing::debug!(run_id, node_id, iteration, "Starting node execution");
}

/// Log node execution completion with the step chosen next.
pub fn log_node_complete(run_id: &str, node_id: &str, next: &str) {
    tracing::debug!(run_id, node_id, next, "Node execution complete");
}

/// Log a synthetic error terminal produced by the executor.
pub fn log_run_fault(run_id: &str, node_id: &str, fault: &RunFault) {
    tracing::error!(run_id, node_id, %fault, "Graph run fault");
}

/// Log run completion at a sentinel.
pub fn log_run_complete(run_id: &str, terminal: &str, steps: usize) {
    tracing::info!(run_id, terminal, steps, "Graph run complete");
}
