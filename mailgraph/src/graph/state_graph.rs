//! State graph: node registry + edge table, compiled into an immutable executor.
//!
//! Add nodes with `add_node` / `add_fn`, declare the entry with `set_entry_point` (or
//! `add_edge(START, first)`), add static edges with `add_edge(from, to)` and routed edges with
//! `add_conditional_edges`, then `compile` to get a `CompiledStateGraph`. Cycles are allowed.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::error::AgentError;
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::config::StepBudget;
use crate::graph::edge::{EdgeRule, EdgeTable};
use crate::graph::node::{FnNode, Node};
use crate::graph::node_middleware::NodeMiddleware;
use crate::state::{is_sentinel, WorkflowState};

/// Pseudo-step for declaring the entry point: `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// State graph under construction.
///
/// Generic over state type `S`. Nothing is validated until `compile`, which reports every
/// statically checkable configuration fault.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S>
where
    S: WorkflowState,
{
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Edge rules in registration order; duplicates are reported at compile time.
    edges: Vec<(String, EdgeRule<S>)>,
    entries: Vec<String>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> Default for StateGraph<S>
where
    S: WorkflowState,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: WorkflowState,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            entries: Vec::new(),
            middleware: None,
        }
    }

    /// Registers `node` under `id`. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Registers an async closure as the node for `id`.
    pub fn add_fn<F, Fut>(&mut self, id: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S::Patch, AgentError>> + Send + 'static,
    {
        self.add_node(id, Arc::new(FnNode::new(f)))
    }

    /// Declares the step a run starts from.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.entries.push(id.into());
        self
    }

    /// Adds a static edge. `add_edge(START, id)` declares the entry point instead.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        let from_id = from_id.into();
        if from_id == START {
            return self.set_entry_point(to_id);
        }
        self.edges.push((from_id, EdgeRule::Static(to_id.into())));
        self
    }

    /// Adds a conditional edge: after `from_id` runs, `router` picks one of `targets`.
    ///
    /// `router` must be pure and total; an answer outside `targets` ends the run in `"error"`.
    pub fn add_conditional_edges<F, I, T>(
        &mut self,
        from_id: impl Into<String>,
        router: F,
        targets: I,
    ) -> &mut Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.edges.push((
            from_id.into(),
            EdgeRule::Conditional {
                router: Arc::new(router),
                targets: targets.into_iter().map(Into::into).collect(),
            },
        ));
        self
    }

    /// Attaches middleware that wraps every node invocation.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Builds the executable graph with the default step budget.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_with_budget(StepBudget::default())
    }

    /// Builds the executable graph with an explicit step budget.
    pub fn compile_with_budget(
        self,
        budget: StepBudget,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        for id in self.nodes.keys() {
            if is_sentinel(id) || id == START {
                return Err(CompilationError::ReservedName(id.clone()));
            }
        }

        let entry = match self.entries.as_slice() {
            [] => return Err(CompilationError::MissingEntry),
            [first, rest @ ..] => {
                if let Some(other) = rest.iter().find(|e| *e != first) {
                    return Err(CompilationError::MultipleEntries(
                        first.clone(),
                        other.clone(),
                    ));
                }
                first.clone()
            }
        };
        if !self.nodes.contains_key(&entry) {
            return Err(CompilationError::NodeNotFound(entry));
        }

        let mut rules: HashMap<String, EdgeRule<S>> = HashMap::new();
        for (from, rule) in self.edges {
            if is_sentinel(&from) {
                return Err(CompilationError::EdgeFromSentinel(from));
            }
            if !self.nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            let targets = rule.targets();
            if targets.is_empty() {
                return Err(CompilationError::EmptyRouteTargets(from));
            }
            if let Some(unknown) = targets
                .iter()
                .find(|t| !is_sentinel(t) && !self.nodes.contains_key(**t))
            {
                return Err(CompilationError::NodeNotFound(unknown.to_string()));
            }
            if rules.contains_key(&from) {
                return Err(CompilationError::DuplicateEdge(from));
            }
            rules.insert(from, rule);
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            edges: EdgeTable::new(rules),
            entry,
            budget,
            middleware: self.middleware,
        })
    }
}
