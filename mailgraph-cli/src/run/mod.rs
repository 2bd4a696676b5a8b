//! Run entry points: run_with_options (env + overrides) and run_with_config.
//!
//! Re-exports [`run_with_options`], [`run_with_config`], [`run_batch`] and the report types.

pub use crate::config::Error;

mod common;
mod generator;
mod report;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use mailgraph::email::email_graph;
use mailgraph::{EmailDeps, InMemoryMailbox};

use crate::config::{RunConfig, RunOptions};
use crate::middleware::WithNodeLogging;

pub use common::{run_batch, run_email, BatchSummary};
pub use generator::{build_generator, scripted_generator};
pub use report::{ReportMemories, RunReport};

/// Runs the email workflow with config from env and overrides from `options`.
///
/// Loads `.env`, builds `RunConfig` from env, applies `options`, loads the fixture, then
/// writes the report to `options.output` (stdout when unset).
pub async fn run_with_options(options: &RunOptions) -> Result<BatchSummary, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options)?;

    let fixture = options
        .fixture
        .as_deref()
        .ok_or("no mailbox fixture given; pass --fixture <path>")?;
    let mailbox = Arc::new(InMemoryMailbox::load(fixture).await?);
    let ids = select_emails(&mailbox, options);

    match &options.output {
        Some(path) => {
            let mut out = BufWriter::new(create_report(path)?);
            run_with_config(&config, mailbox, ids, &mut out).await
        }
        None => {
            let mut out = std::io::stdout();
            run_with_config(&config, mailbox, ids, &mut out).await
        }
    }
}

/// Runs the email workflow for `ids` against `mailbox`; does not read .env.
///
/// The graph is compiled once with node logging and the configured step budget, then
/// shared by every run of the batch.
pub async fn run_with_config<W>(
    config: &RunConfig,
    mailbox: Arc<InMemoryMailbox>,
    ids: Vec<String>,
    out: &mut W,
) -> Result<BatchSummary, Error>
where
    W: Write,
{
    let generator = build_generator(config);
    let graph = email_graph(EmailDeps::from_mailbox(mailbox, generator))
        .with_node_logging()
        .compile_with_budget(config.step_budget()?)?;
    run_batch(&graph, ids, config, out).await
}

/// Email ids to process: the explicit list when given, else the whole mailbox in fixture
/// order, cut to `options.limit`.
pub fn select_emails(mailbox: &InMemoryMailbox, options: &RunOptions) -> Vec<String> {
    let ids = if options.emails.is_empty() {
        mailbox.email_ids()
    } else {
        options.emails.clone()
    };
    match options.limit {
        Some(limit) => ids.into_iter().take(limit).collect(),
        None => ids,
    }
}

fn create_report(path: &Path) -> Result<File, Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
