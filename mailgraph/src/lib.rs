//! # mailgraph
//!
//! A small state-machine workflow engine for multi-step email reply pipelines, plus the
//! reference email workflow built on it.
//!
//! One shared state record flows through named steps. Each step is an async node that returns
//! a *patch* (only the fields it computed); the executor merges the patch with each field's
//! fixed reducer, resolves the next step and emits the step's delta before moving on.
//!
//! ## Design Principles
//!
//! - **Declared schema**: state types are declared with [`workflow_state!`]; each field is tagged
//!   `replace` or `append`, and every patch field is an `Option` so "absent" is never confused
//!   with an empty value.
//! - **Explicit routing**: a node's explicit `current_step` beats the edge table; otherwise a
//!   static or conditional edge picks the next step. `"end"` and `"error"` are the only terminals.
//! - **Faults never escape a run**: node errors, panics, routing faults, budget overruns,
//!   cancellation and timeouts all end the run in `"error"` with a readable message.
//!
//! ## Main Modules
//!
//! - [`state`]: `WorkflowState`, `StatePatch`, reducers, `merge`, the `workflow_state!` macro.
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Run`, `RunnableConfig`.
//! - [`stream`]: `StepEvent` and `RunOutcome`.
//! - [`llm`]: `StructuredGenerator`, `MockGenerator`, and `ChatOpenAI` (feature `openai`).
//! - [`email`]: the email-reply workflow, its collaborators and `InMemoryMailbox`.
//!
//! ## Features
//!
//! - `openai`: OpenAI-compatible structured generation via `async-openai`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mailgraph::{workflow_state, RunnableConfig, StateGraph, StatePatch, END};
//!
//! workflow_state! {
//!     pub struct GreetState, patch GreetPatch {
//!         replace greeting: String,
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut graph = StateGraph::<GreetState>::new();
//! graph
//!     .add_fn("greet", |s: GreetState| async move {
//!         Ok(GreetPatch {
//!             greeting: Some(format!("hello {}", s.item_id)),
//!             ..GreetPatch::goto(END)
//!         })
//!     })
//!     .set_entry_point("greet");
//! let graph = graph.compile().unwrap();
//! let outcome = graph.invoke(GreetState::seed("E1"), RunnableConfig::default()).await;
//! assert_eq!(outcome.state.greeting, "hello E1");
//! # }
//! ```

pub mod email;
pub mod error;
pub mod graph;
pub mod llm;
pub mod state;
pub mod stream;

pub use error::{AgentError, RunFault};
pub use graph::{
    CompilationError, CompiledStateGraph, Node, NodeMiddleware, Run, RunContext, RunnableConfig,
    StateGraph, StepBudget, START,
};
pub use llm::{generate_as, MockGenerator, OutputSchema, StructuredGenerator, StructuredOutput};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use state::{is_sentinel, merge, Reducer, StatePatch, WorkflowState, END, ERROR};
pub use stream::{RunOutcome, StepEvent, StepStreamExt};
pub use email::{
    build_email_graph, Category, EmailDeps, EmailPatch, EmailRecord, EmailState, InMemoryMailbox,
    Instruction, MailboxFixture, Memory, StoreError,
};
