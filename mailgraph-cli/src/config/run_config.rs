//! Run config: generator endpoint, batch limits and budgets. Filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions) and [`run_with_config`](crate::run_with_config).

use std::str::FromStr;
use std::time::Duration;

use mailgraph::StepBudget;

use super::RunOptions;

/// Error type used for config loading and batch runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Runs in flight when neither env nor options say otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Run config for a batch over a mailbox.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    /// OpenAI API key. Without it the scripted generator is used.
    pub api_key: Option<String>,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Sampling temperature 0–2. Default 0 so reruns over one fixture stay comparable.
    pub temperature: f32,
    /// Step budget of every run. Default: the engine's budget.
    pub max_steps: Option<usize>,
    /// Number of emails processed at once.
    pub concurrency: usize,
    /// Wall-clock limit of each run.
    pub run_timeout: Option<Duration>,
    /// Force the scripted generator.
    pub mock: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_steps: None,
            concurrency: DEFAULT_CONCURRENCY,
            run_timeout: None,
            mock: false,
        }
    }
}

impl RunConfig {
    /// Fill config from env vars (and .env). Requires `dotenv::dotenv().ok()` beforehand.
    ///
    /// `OPENAI_API_KEY`, `OPENAI_API_BASE`, `OPENAI_MODEL`, `OPENAI_TEMPERATURE`,
    /// `MAILGRAPH_MAX_STEPS`, `MAILGRAPH_CONCURRENCY` and `MAILGRAPH_RUN_TIMEOUT_SECS` are all
    /// optional. A set but unparsable number is an error rather than a silent default, and so
    /// is a zero step budget.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let api_base = std::env::var("OPENAI_API_BASE").unwrap_or(defaults.api_base);
        let model = std::env::var("OPENAI_MODEL").unwrap_or(defaults.model);
        let temperature = parse_var("OPENAI_TEMPERATURE")?.unwrap_or(defaults.temperature);
        let max_steps =
            check_max_steps("MAILGRAPH_MAX_STEPS", parse_var("MAILGRAPH_MAX_STEPS")?)?;
        let concurrency = parse_var("MAILGRAPH_CONCURRENCY")?.unwrap_or(defaults.concurrency);
        let run_timeout = parse_var::<u64>("MAILGRAPH_RUN_TIMEOUT_SECS")?.map(Duration::from_secs);
        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            max_steps,
            concurrency,
            run_timeout,
            ..defaults
        })
    }

    /// Apply optional overrides from `RunOptions` to this config.
    ///
    /// Only set fields in `options` override; `mock` can only be switched on. A zero
    /// `max_steps` is rejected and leaves the config untouched.
    pub fn apply_options(&mut self, options: &RunOptions) -> Result<(), Error> {
        let max_steps = check_max_steps("--max-steps", options.max_steps)?;
        if let Some(t) = options.temperature {
            self.temperature = t;
        }
        if max_steps.is_some() {
            self.max_steps = max_steps;
        }
        if let Some(n) = options.concurrency {
            self.concurrency = n;
        }
        if options.mock {
            self.mock = true;
        }
        Ok(())
    }

    /// Step budget for compiling the graph; unset falls back to the engine default.
    pub fn step_budget(&self) -> Result<StepBudget, Error> {
        match self.max_steps {
            None => Ok(StepBudget::default()),
            Some(n) => StepBudget::new(n)
                .ok_or_else(|| "max steps must be greater than zero".into()),
        }
    }

    /// Runs in flight, never below one.
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// True when runs go to the OpenAI generator rather than the scripted one.
    pub fn uses_openai(&self) -> bool {
        cfg!(feature = "openai") && !self.mock && self.api_key.is_some()
    }
}

fn check_max_steps(source: &str, value: Option<usize>) -> Result<Option<usize>, Error> {
    match value {
        Some(0) => Err(format!("{} must be greater than zero", source).into()),
        other => Ok(other),
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{} has an invalid value {:?}: {}", name, raw, e).into()),
        _ => Ok(None),
    }
}
