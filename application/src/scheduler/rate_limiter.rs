//! Aggregate per-model rate limiting.
//!
//! One sliding 60-second window per backend model, with the ceiling sized
//! `requests_per_minute x credential count`. The limiter does not track
//! which credential issued which call: the pool already caps each
//! credential at one in-flight call, so the aggregate ceiling is a safe
//! approximation of per-credential fairness — and it avoids the circular
//! dependency of attributing a call to a credential before one is selected.
//!
//! The ceiling is fixed when the limiter is built. A credential entering
//! cooldown mid-job does not shrink it.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, warn};

use mcq_domain::ModelSpec;

/// The sliding window length
const WINDOW: Duration = Duration::from_secs(60);

/// Slack added to computed waits so a retry lands past the window edge
const ADMIT_SAFETY_MARGIN: Duration = Duration::from_millis(50);

/// Sliding-window admission control, one window per model key
pub struct AggregateRateLimiter {
    /// Model key -> max admissions per window (fixed at construction)
    ceilings: HashMap<String, usize>,
    /// Model key -> admission timestamps within the current window
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl AggregateRateLimiter {
    /// Size one ceiling per spec from the credential count at job start.
    ///
    /// Specs with `requests_per_minute == 0` get no window and admit freely;
    /// config validation reports them as errors upstream.
    pub fn new(specs: &[ModelSpec], credential_count: usize) -> Self {
        let mut ceilings = HashMap::new();
        for spec in specs {
            if spec.requests_per_minute == 0 {
                warn!(model = %spec.key, "rpm is 0; model will not be rate limited");
                continue;
            }
            ceilings.insert(
                spec.key.clone(),
                spec.requests_per_minute as usize * credential_count,
            );
        }
        Self {
            ceilings,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until the model's window has room, then record the admission.
    ///
    /// Unknown model keys (and zero-rpm specs) admit immediately.
    pub async fn admit(&self, model_key: &str) {
        let Some(&ceiling) = self.ceilings.get(model_key) else {
            return;
        };

        loop {
            let wait = {
                let now = Instant::now();
                let mut windows = self.windows.lock().unwrap();
                let window = windows.entry(model_key.to_string()).or_default();

                while let Some(&oldest) = window.front()
                    && now.duration_since(oldest) >= WINDOW
                {
                    window.pop_front();
                }

                if window.len() < ceiling {
                    window.push_back(now);
                    return;
                }

                // Window full: wait until the oldest admission ages out
                let oldest = *window.front().expect("full window is non-empty");
                WINDOW - now.duration_since(oldest) + ADMIT_SAFETY_MARGIN
            };

            debug!(model = model_key, ?wait, "rate ceiling reached, waiting");
            sleep(wait).await;
        }
    }

    /// The fixed admission ceiling for `model_key`, if it is limited
    pub fn ceiling(&self, model_key: &str) -> Option<usize> {
        self.ceilings.get(model_key).copied()
    }

    /// Admissions currently inside `model_key`'s window
    pub fn in_window(&self, model_key: &str) -> usize {
        let now = Instant::now();
        let windows = self.windows.lock().unwrap();
        windows
            .get(model_key)
            .map(|w| {
                w.iter()
                    .filter(|&&t| now.duration_since(t) < WINDOW)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn limiter(rpm: u32, credentials: usize) -> AggregateRateLimiter {
        let specs = vec![ModelSpec::new("m", "backend-m").with_rpm(rpm)];
        AggregateRateLimiter::new(&specs, credentials)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_is_rpm_times_credentials() {
        let limiter = limiter(2, 3);
        assert_eq!(limiter.ceiling("m"), Some(6));

        let start = Instant::now();
        for _ in 0..6 {
            limiter.admit("m").await;
        }
        // No waiting below the ceiling
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_window("m"), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_call_waits_for_window() {
        // Scenario: 2 credentials, rpm 1 -> ceiling 2. The third call waits
        // until the first admission leaves the 60s window.
        let limiter = limiter(1, 2);
        let start = Instant::now();

        limiter.admit("m").await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        limiter.admit("m").await;

        limiter.admit("m").await;
        let elapsed = start.elapsed();
        // The first admission ages out at t=60; margin allows a little slack
        assert!(elapsed >= Duration::from_secs(60), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(61), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rolling_window_never_exceeds_ceiling() {
        let limiter = Arc::new(limiter(2, 2));
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let limiter = Arc::clone(&limiter);
            let log = Arc::clone(&log);
            tasks.spawn(async move {
                limiter.admit("m").await;
                log.lock().unwrap().push(Instant::now());
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        // No rolling 60s span contains more than rpm x credentials stamps
        let mut stamps = log.lock().unwrap().clone();
        stamps.sort();
        for (i, &t) in stamps.iter().enumerate() {
            let in_window = stamps[i..]
                .iter()
                .take_while(|&&u| u.duration_since(t) < WINDOW)
                .count();
            assert!(in_window <= 4, "{} admissions within one window", in_window);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_fixed_despite_pool_cooldown() {
        // The ceiling is sized once from the original credential count; a
        // cooldown shrinking the live pool does not shrink admission.
        use crate::scheduler::credential_pool::CredentialPool;

        let pool = CredentialPool::new((0..3).map(|i| (format!("key-{}", i), "s".to_string())));
        let limiter = limiter(1, pool.total_count());
        assert_eq!(limiter.ceiling("m"), Some(3));

        let lease = pool.acquire().await;
        pool.set_cooldown(lease, Duration::from_secs(300));
        assert_eq!(pool.available_count(), 2);

        // All three admissions still pass immediately
        let start = Instant::now();
        for _ in 0..3 {
            limiter.admit("m").await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_model_admits_freely() {
        let limiter = limiter(1, 1);
        for _ in 0..100 {
            limiter.admit("not-configured").await;
        }
        assert_eq!(limiter.in_window("not-configured"), 0);
    }

    #[tokio::test]
    async fn test_zero_rpm_is_unlimited() {
        let limiter = limiter(0, 5);
        assert_eq!(limiter.ceiling("m"), None);
        for _ in 0..100 {
            limiter.admit("m").await;
        }
    }
}
