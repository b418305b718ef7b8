//! CLI entrypoint for mcq-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod output;
mod progress;
mod questions;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{Cli, OutputFormat};
use output::ConsoleFormatter;
use progress::ProgressReporter;
use questions::load_questions;

use mcq_application::{
    AggregateRateLimiter, CallDispatcher, Caller, CompositeProgress, CredentialPool,
    ProgressNotifier, SolveInput, SolveUseCase, UsageStats,
};
use mcq_infrastructure::config::ProviderMode;
use mcq_infrastructure::{ConfigLoader, DirectCaller, JsonlEventLogger, ProxyCaller};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("config error: {}", e))?
    };

    let issues = config.validate();
    for issue in &issues {
        eprintln!("{}", issue);
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("configuration is not usable; fix the errors above");
    }

    // === Inputs ===
    let questions_path = match cli.questions {
        Some(path) => path,
        None => bail!("a questions JSON file is required (see --help)"),
    };
    let questions = load_questions(&questions_path)?;

    let specs = config.model_specs(&cli.model);
    if specs.is_empty() {
        bail!(
            "no models enabled; configured keys are: {}",
            config
                .models
                .iter()
                .map(|m| m.key.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut options = config.solver.to_options();
    if let Some(strategy) = cli.strategy {
        options = options.with_strategy(strategy.into());
    }
    if let Some(percent) = cli.early_stop {
        options = options.with_early_stop(percent);
    }
    if let Some(limit) = cli.concurrency {
        options = options.with_concurrency_limit(limit);
    }
    if cli.racing {
        options = options.with_racing(true);
    }

    info!(
        questions = questions.len(),
        models = specs.len(),
        credentials = config.credentials.len(),
        "starting mcq-quorum"
    );

    // === Dependency Injection ===
    let timeout = Duration::from_secs(config.provider.timeout_secs);
    let caller: Arc<dyn Caller> = match config.provider.mode {
        ProviderMode::Direct => Arc::new(DirectCaller::new(timeout)?),
        ProviderMode::Proxy => {
            let base_url = config
                .provider
                .proxy_url
                .clone()
                .expect("validated above");
            Arc::new(ProxyCaller::new(
                base_url,
                config.provider.proxy_token.as_deref(),
                timeout,
            )?)
        }
    };

    let pool = Arc::new(CredentialPool::new(config.credential_entries()));
    let limiter = Arc::new(AggregateRateLimiter::new(&specs, pool.total_count()));
    let stats = Arc::new(UsageStats::new());
    let dispatcher = Arc::new(CallDispatcher::new(
        pool,
        limiter,
        caller,
        Arc::clone(&stats),
    ));
    let use_case = SolveUseCase::new(dispatcher);

    let mut notifiers: Vec<Arc<dyn ProgressNotifier>> = Vec::new();
    if !cli.quiet {
        notifiers.push(Arc::new(ProgressReporter::new()));
    }
    if let Some(path) = &cli.event_log
        && let Some(logger) = JsonlEventLogger::new(path)
    {
        notifiers.push(Arc::new(logger));
    }
    let progress = CompositeProgress::new(notifiers);

    // === Solve ===
    let input = SolveInput::new(questions, specs).with_options(options);
    let outcome = use_case.execute_with_progress(input, &progress).await?;

    let text = match cli.output {
        OutputFormat::Answers => ConsoleFormatter::format_answers(&outcome),
        OutputFormat::Full => ConsoleFormatter::format_full(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };
    print!("{}", text);

    if cli.stats {
        print!("{}", ConsoleFormatter::format_stats(&stats.snapshot_and_reset()));
    }

    Ok(())
}
