//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use mcq_application::DispatchStrategy;

/// Output format for solve results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One line per question with confidence
    Answers,
    /// Answers plus per-option vote detail
    Full,
    /// JSON output
    Json,
}

/// Dispatch strategy flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// One call answers every question; fewest API calls
    Batched,
    /// One exclusive-credential call per question; fastest wall-clock
    PerQuestion,
}

impl From<StrategyArg> for DispatchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Batched => DispatchStrategy::Batched,
            StrategyArg::PerQuestion => DispatchStrategy::PerQuestion,
        }
    }
}

/// CLI arguments for mcq-quorum
#[derive(Parser, Debug)]
#[command(name = "mcq-quorum")]
#[command(author, version, about = "Answer question batches with a weighted multi-model quorum")]
#[command(long_about = r#"
mcq-quorum answers a batch of multiple-choice questions by querying every
enabled model several times across a pool of API keys, then merging the
answers into a weighted consensus per question. Every question always gets
an answer, even when calls fail.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./mcq.toml          Project-level config
3. ~/.config/mcq-quorum/config.toml   Global config

Example:
  mcq-quorum questions.json
  mcq-quorum -m pro -m flash --early-stop 60 questions.json
  mcq-quorum --strategy per-question --stats questions.json
"#)]
pub struct Cli {
    /// Path to the questions JSON file
    pub questions: Option<PathBuf>,

    /// Model keys to enable (defaults to every configured model)
    #[arg(short, long, value_name = "KEY")]
    pub model: Vec<String>,

    /// Dispatch strategy (overrides the config file)
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Stop scheduling calls once every question reaches this confidence
    #[arg(long, value_name = "PERCENT")]
    pub early_stop: Option<f64>,

    /// Cap on concurrently in-flight calls
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Race batched calls across all credentials
    #[arg(long)]
    pub racing: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answers")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Print usage statistics after solving
    #[arg(long)]
    pub stats: bool,

    /// Append solve events to a JSONL audit log
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
