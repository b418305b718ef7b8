//! Usage counters for external telemetry.
//!
//! Counters accumulate across one or more solve jobs and are consumed with
//! [`UsageStats::snapshot_and_reset`] — a read-and-reset so external
//! displays see deltas, not lifetime totals.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Shared mutable usage counters
#[derive(Debug, Default)]
pub struct UsageStats {
    total_calls: AtomicU64,
    rotations: AtomicU64,
    rate_limit_hits: AtomicU64,
    per_model: Mutex<BTreeMap<String, u64>>,
    per_credential: Mutex<BTreeMap<String, u64>>,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub total_calls: u64,
    pub rotations: u64,
    pub rate_limit_hits: u64,
    pub per_model: BTreeMap<String, u64>,
    pub per_credential: BTreeMap<String, u64>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful call for a model/credential pair
    pub fn record_call(&self, model_key: &str, credential_label: &str) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        *self
            .per_model
            .lock()
            .unwrap()
            .entry(model_key.to_string())
            .or_insert(0) += 1;
        *self
            .per_credential
            .lock()
            .unwrap()
            .entry(credential_label.to_string())
            .or_insert(0) += 1;
    }

    /// Record a rotation to a different credential after a rate limit
    pub fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one rate-limit rejection from the backend
    pub fn record_rate_limit(&self) {
        self.rate_limit_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the counters without resetting them
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            rate_limit_hits: self.rate_limit_hits.load(Ordering::Relaxed),
            per_model: self.per_model.lock().unwrap().clone(),
            per_credential: self.per_credential.lock().unwrap().clone(),
        }
    }

    /// Copy the counters and zero them
    pub fn snapshot_and_reset(&self) -> UsageSnapshot {
        UsageSnapshot {
            total_calls: self.total_calls.swap(0, Ordering::Relaxed),
            rotations: self.rotations.swap(0, Ordering::Relaxed),
            rate_limit_hits: self.rate_limit_hits.swap(0, Ordering::Relaxed),
            per_model: std::mem::take(&mut *self.per_model.lock().unwrap()),
            per_credential: std::mem::take(&mut *self.per_credential.lock().unwrap()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = UsageStats::new();
        stats.record_call("pro", "key-0");
        stats.record_call("pro", "key-1");
        stats.record_call("flash", "key-0");
        stats.record_rotation();
        stats.record_rate_limit();
        stats.record_rate_limit();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_calls, 3);
        assert_eq!(snapshot.rotations, 1);
        assert_eq!(snapshot.rate_limit_hits, 2);
        assert_eq!(snapshot.per_model.get("pro"), Some(&2));
        assert_eq!(snapshot.per_credential.get("key-0"), Some(&2));
    }

    #[test]
    fn test_snapshot_and_reset_zeroes() {
        let stats = UsageStats::new();
        stats.record_call("pro", "key-0");
        stats.record_rate_limit();

        let first = stats.snapshot_and_reset();
        assert_eq!(first.total_calls, 1);

        let second = stats.snapshot_and_reset();
        assert_eq!(second, UsageSnapshot::default());
    }
}
