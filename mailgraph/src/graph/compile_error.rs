//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the node registry and edge table do not describe a
//! runnable graph. Everything checkable before a run starts is reported here, once.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A step named by an edge, router target or the entry point has no node and is not a sentinel.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No entry point was declared (`set_entry_point` or `add_edge(START, ..)`).
    #[error("graph must declare an entry point")]
    MissingEntry,

    /// Two different entry points were declared.
    #[error("graph declares more than one entry point: {0} and {1}")]
    MultipleEntries(String, String),

    /// More than one edge rule (static or conditional) registered for the same step.
    #[error("step {0} has more than one outgoing edge rule")]
    DuplicateEdge(String),

    /// A node was registered under `"end"`, `"error"` or START.
    #[error("step name {0} is reserved")]
    ReservedName(String),

    /// An edge rule was registered from a sentinel step.
    #[error("sentinel step {0} cannot have outgoing edges")]
    EdgeFromSentinel(String),

    /// A conditional edge declared no candidate targets.
    #[error("conditional edge from {0} declares no targets")]
    EmptyRouteTargets(String),
}
