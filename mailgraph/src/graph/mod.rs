//! State graph: nodes, edge table, compile and run.
//!
//! Add nodes and edges to a [`StateGraph`], compile it, then drive runs with
//! [`CompiledStateGraph::stream`], [`CompiledStateGraph::steps`], [`CompiledStateGraph::invoke`]
//! or step-by-step through [`Run`].

mod compile_error;
mod compiled;
mod config;
mod edge;
pub mod logging;
mod node;
mod node_middleware;
mod run;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use config::{RunnableConfig, StepBudget};
pub use edge::{EdgeRule, EdgeTable, Router};
pub use node::{FnNode, Node};
pub use node_middleware::NodeMiddleware;
pub use run::Run;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, START};
