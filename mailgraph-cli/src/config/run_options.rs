//! Optional overrides for a batch run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use std::path::PathBuf;

/// Optional overrides for a batch run: which emails, how many at once, where to report.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Mailbox fixture to load. Required by [`run_with_options`](crate::run_with_options).
    pub fixture: Option<PathBuf>,
    /// Process at most this many emails, in fixture order.
    pub limit: Option<usize>,
    /// Process only these email ids.
    pub emails: Vec<String>,
    /// JSON-lines report file; stdout when unset.
    pub output: Option<PathBuf>,
    /// Override the number of runs in flight.
    pub concurrency: Option<usize>,
    /// Override the step budget of every run.
    pub max_steps: Option<usize>,
    /// Override the sampling temperature (0–2).
    pub temperature: Option<f32>,
    /// Use the scripted generator even when an API key is configured.
    pub mock: bool,
}
