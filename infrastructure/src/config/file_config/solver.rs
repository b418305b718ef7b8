//! Solver settings from TOML (`[solver]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use mcq_application::{DispatchStrategy, SolveOptions};

/// Solve loop control from the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSolverConfig {
    /// "batched" or "per-question"
    pub strategy: DispatchStrategy,
    /// Cap on concurrently in-flight calls
    pub concurrency: Option<usize>,
    /// Stop scheduling once every question reaches this confidence
    pub early_stop_percent: Option<f64>,
    /// Credential cooldown after a rate-limited exclusive call
    pub cooldown_secs: u64,
    /// Race batched calls across all credentials
    pub racing: bool,
}

impl Default for FileSolverConfig {
    fn default() -> Self {
        Self {
            strategy: DispatchStrategy::Batched,
            concurrency: None,
            early_stop_percent: None,
            cooldown_secs: 30,
            racing: false,
        }
    }
}

impl FileSolverConfig {
    pub fn to_options(&self) -> SolveOptions {
        let mut options = SolveOptions::default()
            .with_strategy(self.strategy)
            .with_cooldown(Duration::from_secs(self.cooldown_secs))
            .with_racing(self.racing);
        if let Some(limit) = self.concurrency {
            options = options.with_concurrency_limit(limit);
        }
        if let Some(percent) = self.early_stop_percent {
            options = options.with_early_stop(percent);
        }
        options
    }
}
