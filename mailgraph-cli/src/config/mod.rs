//! Configuration types for running the email workflow over a mailbox.
//!
//! Re-exports [`RunConfig`], [`RunOptions`] and config [`Error`].

mod run_config;
mod run_options;

pub use run_config::{Error, RunConfig, DEFAULT_CONCURRENCY};
pub use run_options::RunOptions;
