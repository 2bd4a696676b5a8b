//! mailgraph-cli library: batch driver for the email reply workflow.
//!
//! Reads generator config from .env, loads a mailbox fixture, runs the email graph for each
//! selected email and writes one JSON report line per email.
//!
//! ## Usage
//!
//! ```rust,no_run,ignore
//! let options = mailgraph_cli::RunOptions {
//!     fixture: Some("mailbox.json".into()),
//!     ..Default::default()
//! };
//! let summary = mailgraph_cli::run_with_options(&options).await?;
//! assert_eq!(summary.failed(), 0);
//! ```

mod config;
mod middleware;
mod run;

pub use config::{Error, RunConfig, RunOptions, DEFAULT_CONCURRENCY};
pub use middleware::{LoggingMiddleware, WithNodeLogging};
pub use run::{
    build_generator, run_batch, run_email, run_with_config, run_with_options,
    scripted_generator, select_emails, BatchSummary, ReportMemories, RunReport,
};

#[cfg(test)]
mod tests;
