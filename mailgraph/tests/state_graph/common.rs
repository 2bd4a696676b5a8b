//! Shared schema and stub nodes for state graph integration tests.

use async_trait::async_trait;
use mailgraph::{workflow_state, AgentError, Node, StatePatch};

workflow_state! {
    pub struct FlowState, patch FlowPatch {
        replace note: String,
        replace visits: u32,
        append trail: Vec<String>,
    }
}

/// Records its name in `trail` and routes to `to` (or leaves routing to the edges).
pub struct Stamp {
    name: &'static str,
    to: Option<&'static str>,
}

impl Stamp {
    pub fn new(name: &'static str) -> Self {
        Self { name, to: None }
    }

    pub fn then(name: &'static str, to: &'static str) -> Self {
        Self { name, to: Some(to) }
    }
}

#[async_trait]
impl Node<FlowState> for Stamp {
    async fn run(&self, _state: &FlowState) -> Result<FlowPatch, AgentError> {
        let patch = match self.to {
            Some(to) => FlowPatch::goto(to),
            None => FlowPatch::default(),
        };
        Ok(FlowPatch {
            trail: Some(vec![self.name.to_string()]),
            ..patch
        })
    }
}
