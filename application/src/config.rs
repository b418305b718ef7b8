//! Solve options — use case loop control.
//!
//! [`SolveOptions`] groups the static parameters that control one solve
//! invocation. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How calls are fanned out across questions and models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchStrategy {
    /// One call serializes every question into a single prompt; repeated
    /// per model iteration. Minimizes total API calls.
    #[default]
    Batched,
    /// One exclusive-credential call per question per model iteration.
    /// Maximizes wall-clock throughput on large batches.
    PerQuestion,
}

/// Loop control parameters for one solve invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptions {
    pub strategy: DispatchStrategy,
    /// Cap on concurrently in-flight calls (`None` = no cap beyond the
    /// pool/limiter)
    pub concurrency_limit: Option<usize>,
    /// Stop scheduling new calls once every question's leader confidence
    /// reaches this percentage
    pub early_stop_confidence_percent: Option<f64>,
    /// How long a credential cools down after a rate-limited exclusive call
    pub cooldown: Duration,
    /// Route batched calls through the racing dispatcher (one attempt per
    /// credential, first success wins)
    pub racing: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            strategy: DispatchStrategy::Batched,
            concurrency_limit: None,
            early_stop_confidence_percent: None,
            cooldown: Duration::from_secs(30),
            racing: false,
        }
    }
}

impl SolveOptions {
    // ==================== Builder Methods ====================

    pub fn with_strategy(mut self, strategy: DispatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }

    pub fn with_early_stop(mut self, percent: f64) -> Self {
        self.early_stop_confidence_percent = Some(percent);
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_racing(mut self, racing: bool) -> Self {
        self.racing = racing;
        self
    }
}
