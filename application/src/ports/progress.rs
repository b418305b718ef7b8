//! Progress notification port
//!
//! Defines the interface for streaming partial results during a solve.
//! Implementations live in the presentation layer (console bars, JSONL
//! audit logs) and must tolerate being called from multiple tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One streamed update: a batch of votes was recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveProgress {
    /// Model that produced the batch
    pub model_key: String,
    /// Which iteration of that model's call budget
    pub iteration: u32,
    /// Current leading answer per question
    pub answers_so_far: BTreeMap<String, char>,
}

/// Callback for progress updates during a solve
pub trait ProgressNotifier: Send + Sync {
    /// Called once when the schedule is known
    fn on_solve_start(&self, _total_calls: usize) {}

    /// Called after each call's votes are recorded
    fn on_batch_recorded(&self, _update: &SolveProgress) {}

    /// Called when a call fails past the dispatcher's retries
    fn on_call_failed(&self, _model_key: &str, _iteration: u32, _error: &str) {}

    /// Called after finalization, with the number of resolved questions
    fn on_solve_complete(&self, _resolved: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}

/// Fans progress events out to several notifiers (e.g. console + JSONL log)
pub struct CompositeProgress {
    notifiers: Vec<Arc<dyn ProgressNotifier>>,
}

impl CompositeProgress {
    pub fn new(notifiers: Vec<Arc<dyn ProgressNotifier>>) -> Self {
        Self { notifiers }
    }
}

impl ProgressNotifier for CompositeProgress {
    fn on_solve_start(&self, total_calls: usize) {
        for n in &self.notifiers {
            n.on_solve_start(total_calls);
        }
    }

    fn on_batch_recorded(&self, update: &SolveProgress) {
        for n in &self.notifiers {
            n.on_batch_recorded(update);
        }
    }

    fn on_call_failed(&self, model_key: &str, iteration: u32, error: &str) {
        for n in &self.notifiers {
            n.on_call_failed(model_key, iteration, error);
        }
    }

    fn on_solve_complete(&self, resolved: usize) {
        for n in &self.notifiers {
            n.on_solve_complete(resolved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    impl ProgressNotifier for Counting {
        fn on_solve_start(&self, _total: usize) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let a = Arc::new(Counting(AtomicUsize::new(0)));
        let b = Arc::new(Counting(AtomicUsize::new(0)));
        let composite = CompositeProgress::new(vec![a.clone(), b.clone()]);

        composite.on_solve_start(10);
        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }
}
