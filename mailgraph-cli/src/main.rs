//! mailgraph binary: run the email reply workflow over a mailbox fixture.

use std::path::PathBuf;

use clap::Parser;
use mailgraph_cli::{run_with_options, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mailgraph")]
#[command(about = "Email reply workflow: categorize, map memories, draft responses and follow-ups")]
struct Args {
    /// Mailbox fixture (JSON with emails, categories and instructions)
    #[arg(short, long, value_name = "PATH")]
    fixture: PathBuf,

    /// Process at most N emails, in fixture order
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Process only this email id (repeatable)
    #[arg(short, long = "email", value_name = "ID")]
    emails: Vec<String>,

    /// Write JSON-lines report here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emails processed at once (env MAILGRAPH_CONCURRENCY, default 4)
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Step budget per run (env MAILGRAPH_MAX_STEPS, default 1000)
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Sampling temperature 0-2 (env OPENAI_TEMPERATURE, default 0)
    #[arg(long, value_name = "T")]
    temperature: Option<f32>,

    /// Use scripted answers even when OPENAI_API_KEY is set
    #[arg(long)]
    mock: bool,

    /// Log node enter/exit and engine debug events
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        RunOptions {
            fixture: Some(args.fixture),
            limit: args.limit,
            emails: args.emails,
            output: args.output,
            concurrency: args.concurrency,
            max_steps: args.max_steps,
            temperature: args.temperature,
            mock: args.mock,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,mailgraph=debug,mailgraph_cli=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    let options = RunOptions::from(args);

    let summary = match run_with_options(&options).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!(
        "processed {} email(s): {} done, {} failed",
        summary.reports.len(),
        summary.succeeded(),
        summary.failed()
    );
    if summary.failed() > 0 {
        std::process::exit(1);
    }
}
