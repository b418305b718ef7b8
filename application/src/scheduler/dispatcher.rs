//! Call dispatch with admission, selection, and classified retry.
//!
//! One [`CallDispatcher`] wraps every outbound call of a job. The retry
//! policy follows the error classification from the [`Caller`] boundary:
//!
//! - `RateLimited` — rotate to the next credential (unless pinned) and back
//!   off exponentially, up to `2 x credential count` attempts.
//! - `InvalidArgument` — one retry with a stripped response config; the
//!   error is not credential-dependent, so more retries are wasted work.
//! - `Other` — fail fast.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

use mcq_domain::ModelSpec;

use crate::ports::caller::{CallError, Caller, Credential, GenerateReply, ResponseConfig};

use super::credential_pool::CredentialPool;
use super::rate_limiter::AggregateRateLimiter;
use super::stats::UsageStats;

/// First backoff delay after a rate-limit rejection
const BACKOFF_INITIAL_MS: f64 = 750.0;
/// Backoff growth per attempt
const BACKOFF_FACTOR: f64 = 1.8;
/// Backoff ceiling
const BACKOFF_CAP_MS: f64 = 8_000.0;

/// Wraps one outbound call with credential selection and retry
pub struct CallDispatcher {
    pool: Arc<CredentialPool>,
    limiter: Arc<AggregateRateLimiter>,
    caller: Arc<dyn Caller>,
    stats: Arc<UsageStats>,
    rr_counter: AtomicUsize,
}

impl CallDispatcher {
    pub fn new(
        pool: Arc<CredentialPool>,
        limiter: Arc<AggregateRateLimiter>,
        caller: Arc<dyn Caller>,
        stats: Arc<UsageStats>,
    ) -> Self {
        Self {
            pool,
            limiter,
            caller,
            stats,
            rr_counter: AtomicUsize::new(0),
        }
    }

    pub fn pool(&self) -> &Arc<CredentialPool> {
        &self.pool
    }

    pub fn stats(&self) -> &Arc<UsageStats> {
        &self.stats
    }

    /// Exponential backoff: 750ms, x1.8 per retry, capped at 8s
    fn backoff_delay(retry: usize) -> Duration {
        let ms = BACKOFF_INITIAL_MS * BACKOFF_FACTOR.powi(retry as i32);
        Duration::from_millis(ms.min(BACKOFF_CAP_MS) as u64)
    }

    fn next_round_robin(&self, credentials: &[Credential]) -> Credential {
        let i = self.rr_counter.fetch_add(1, Ordering::Relaxed);
        credentials[i % credentials.len()].clone()
    }

    /// Dispatch one call with rotation and backoff.
    ///
    /// `pinned` forces every attempt onto one credential, for operations
    /// that must stay where an earlier call left state (e.g. an uploaded
    /// file scoped to that credential).
    pub async fn dispatch(
        &self,
        op: &str,
        spec: &ModelSpec,
        prompt: &str,
        config: &ResponseConfig,
        pinned: Option<&Credential>,
    ) -> Result<GenerateReply, CallError> {
        let credentials = self.pool.credentials();
        if credentials.is_empty() && pinned.is_none() {
            return Err(CallError::Other("credential pool is empty".to_string()));
        }

        let max_attempts = credentials.len().max(1) * 2;
        let mut config = config.clone();
        let mut stripped_retry_spent = false;
        let mut rate_limit_attempts = 0;

        loop {
            self.limiter.admit(&spec.key).await;

            let credential = match pinned {
                Some(c) => c.clone(),
                None => self.next_round_robin(&credentials),
            };
            debug!(op, model = %spec.key, credential = %credential, "dispatching call");

            match self
                .caller
                .generate(&credential, &spec.backend_model_name, prompt, &config)
                .await
            {
                Ok(reply) => {
                    self.stats.record_call(&spec.key, &credential.label);
                    return Ok(reply);
                }
                Err(CallError::RateLimited(message)) => {
                    self.stats.record_rate_limit();
                    rate_limit_attempts += 1;
                    if rate_limit_attempts >= max_attempts {
                        warn!(
                            op,
                            model = %spec.key,
                            attempts = rate_limit_attempts,
                            "rate limited on every attempt, giving up"
                        );
                        return Err(CallError::RateLimited(message));
                    }
                    if pinned.is_none() {
                        self.stats.record_rotation();
                    }
                    let delay = Self::backoff_delay(rate_limit_attempts - 1);
                    debug!(op, model = %spec.key, ?delay, "rate limited, backing off");
                    sleep(delay).await;
                }
                Err(CallError::InvalidArgument(message)) => {
                    if stripped_retry_spent {
                        return Err(CallError::InvalidArgument(message));
                    }
                    stripped_retry_spent = true;
                    config = ResponseConfig::minimal();
                    debug!(op, model = %spec.key, "invalid argument, retrying with minimal config");
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Concurrent variant: race one attempt per credential each cycle and
    /// take the first success, backing off between cycles.
    ///
    /// Useful when many independent calls must all succeed quickly; the
    /// losing in-flight attempts of a won cycle are dropped.
    pub async fn dispatch_racing(
        &self,
        op: &str,
        spec: &ModelSpec,
        prompt: &str,
        config: &ResponseConfig,
        max_cycles: usize,
    ) -> Result<GenerateReply, CallError> {
        let credentials = self.pool.credentials();
        if credentials.is_empty() {
            return Err(CallError::Other("credential pool is empty".to_string()));
        }

        let mut last_error = CallError::Other("no attempts made".to_string());
        let max_cycles = max_cycles.max(1);

        for cycle in 0..max_cycles {
            let mut attempts = FuturesUnordered::new();
            for credential in credentials.iter().cloned() {
                let caller = Arc::clone(&self.caller);
                let limiter = Arc::clone(&self.limiter);
                let model_key = spec.key.clone();
                let backend = spec.backend_model_name.clone();
                let prompt = prompt.to_string();
                let config = config.clone();
                attempts.push(async move {
                    limiter.admit(&model_key).await;
                    let result = caller.generate(&credential, &backend, &prompt, &config).await;
                    (credential, result)
                });
            }

            while let Some((credential, result)) = attempts.next().await {
                match result {
                    Ok(reply) => {
                        self.stats.record_call(&spec.key, &credential.label);
                        return Ok(reply);
                    }
                    Err(error) => {
                        if error.is_rate_limited() {
                            self.stats.record_rate_limit();
                        }
                        debug!(op, credential = %credential, %error, "racing attempt failed");
                        last_error = error;
                    }
                }
            }

            if cycle + 1 < max_cycles {
                sleep(Self::backoff_delay(cycle)).await;
            }
        }

        warn!(op, model = %spec.key, cycles = max_cycles, "all racing cycles failed");
        Err(last_error)
    }

    /// Exclusive variant for the one-call-per-credential strategy: lease a
    /// credential, make a single call, then release it — or put it in
    /// cooldown when the backend rate-limited us.
    pub async fn dispatch_exclusive(
        &self,
        op: &str,
        spec: &ModelSpec,
        prompt: &str,
        config: &ResponseConfig,
        cooldown: Duration,
    ) -> Result<GenerateReply, CallError> {
        self.limiter.admit(&spec.key).await;
        let lease = self.pool.acquire().await;
        let credential = lease.credential().clone();
        debug!(op, model = %spec.key, credential = %credential, "dispatching exclusive call");

        match self
            .caller
            .generate(&credential, &spec.backend_model_name, prompt, config)
            .await
        {
            Ok(reply) => {
                self.stats.record_call(&spec.key, &credential.label);
                self.pool.release(lease);
                Ok(reply)
            }
            Err(error) if error.is_rate_limited() => {
                self.stats.record_rate_limit();
                self.pool.set_cooldown(lease, cooldown);
                Err(error)
            }
            Err(error) => {
                self.pool.release(lease);
                Err(error)
            }
        }
    }
}
