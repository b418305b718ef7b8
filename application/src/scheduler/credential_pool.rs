//! Credential pool with exclusive leases and cooldown.
//!
//! The pool owns the process's API credentials. At most one call runs per
//! credential at a time: `acquire` hands out a lease and marks the slot
//! busy, `release` returns it, and `set_cooldown` parks a rate-limited
//! credential for a while — clearing the busy flag at the same time so a
//! cooling credential is never stuck busy.
//!
//! `acquire` never fails; on an empty pool it waits forever. Keeping the
//! pool non-empty is the caller's job (config validation enforces it).

use std::sync::{Arc, Mutex};

use tokio::time::{Duration, Instant, sleep};
use tracing::debug;

use crate::ports::caller::Credential;

/// How often a blocked `acquire` re-checks the slots
const ACQUIRE_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Available,
    Busy,
    Cooldown(Instant),
}

#[derive(Debug)]
struct Slot {
    credential: Credential,
    state: SlotState,
}

/// Pool of interchangeable credentials
pub struct CredentialPool {
    slots: Arc<Mutex<Vec<Slot>>>,
}

/// Exclusive hold on one credential.
///
/// Dropping a lease releases the credential, so a panicking task cannot
/// leak a busy slot. Prefer the explicit [`CredentialPool::release`] /
/// [`CredentialPool::set_cooldown`] at normal exits.
#[must_use = "dropping a lease releases the credential immediately"]
pub struct CredentialLease {
    credential: Credential,
    slots: Arc<Mutex<Vec<Slot>>>,
    consumed: bool,
}

impl CredentialLease {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn index(&self) -> usize {
        self.credential.index
    }
}

impl Drop for CredentialLease {
    fn drop(&mut self) {
        if self.consumed {
            return;
        }
        if let Ok(mut slots) = self.slots.lock()
            && let Some(slot) = slots.get_mut(self.credential.index)
        {
            slot.state = SlotState::Available;
        }
    }
}

impl CredentialPool {
    /// Build a pool from `(label, secret)` pairs; indices follow the order
    /// given.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let slots = entries
            .into_iter()
            .enumerate()
            .map(|(index, (label, secret))| Slot {
                credential: Credential::new(index, label, secret),
                state: SlotState::Available,
            })
            .collect();
        Self {
            slots: Arc::new(Mutex::new(slots)),
        }
    }

    /// Append a newly-known credential at runtime; returns its handle.
    pub fn push(&self, label: impl Into<String>, secret: impl Into<String>) -> Credential {
        let mut slots = self.slots.lock().unwrap();
        let credential = Credential::new(slots.len(), label, secret);
        slots.push(Slot {
            credential: credential.clone(),
            state: SlotState::Available,
        });
        credential
    }

    /// Take a lease on the first usable credential, waiting until one frees
    /// up. Expired cooldowns count as usable.
    pub async fn acquire(&self) -> CredentialLease {
        loop {
            if let Some(lease) = self.try_acquire() {
                return lease;
            }
            sleep(ACQUIRE_POLL_INTERVAL).await;
        }
    }

    /// Non-blocking acquire
    pub fn try_acquire(&self) -> Option<CredentialLease> {
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap();
        for slot in slots.iter_mut() {
            let usable = match slot.state {
                SlotState::Available => true,
                SlotState::Cooldown(until) => until <= now,
                SlotState::Busy => false,
            };
            if usable {
                slot.state = SlotState::Busy;
                debug!(credential = %slot.credential, "credential acquired");
                return Some(CredentialLease {
                    credential: slot.credential.clone(),
                    slots: Arc::clone(&self.slots),
                    consumed: false,
                });
            }
        }
        None
    }

    /// Return a leased credential to the pool
    pub fn release(&self, mut lease: CredentialLease) {
        lease.consumed = true;
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get_mut(lease.credential.index) {
            slot.state = SlotState::Available;
            debug!(credential = %slot.credential, "credential released");
        }
    }

    /// Park a leased credential for `duration` and clear its busy flag
    pub fn set_cooldown(&self, mut lease: CredentialLease, duration: Duration) {
        lease.consumed = true;
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get_mut(lease.credential.index) {
            slot.state = SlotState::Cooldown(Instant::now() + duration);
            debug!(credential = %slot.credential, ?duration, "credential cooling down");
        }
    }

    /// Credentials currently usable (available or past cooldown)
    pub fn available_count(&self) -> usize {
        let now = Instant::now();
        let slots = self.slots.lock().unwrap();
        slots
            .iter()
            .filter(|s| match s.state {
                SlotState::Available => true,
                SlotState::Cooldown(until) => until <= now,
                SlotState::Busy => false,
            })
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    /// Cloned handles to every credential, in index order.
    ///
    /// Used by the dispatcher's round-robin selection, which does not need
    /// exclusivity — the pool's lease API is for the one-call-per-credential
    /// strategy.
    pub fn credentials(&self) -> Vec<Credential> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.credential.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::task::JoinSet;

    fn pool(n: usize) -> CredentialPool {
        CredentialPool::new((0..n).map(|i| (format!("key-{}", i), format!("secret-{}", i))))
    }

    #[tokio::test]
    async fn test_acquire_release_cycle() {
        let pool = pool(1);
        let lease = pool.acquire().await;
        assert_eq!(lease.index(), 0);
        assert_eq!(pool.available_count(), 0);

        pool.release(lease);
        assert_eq!(pool.available_count(), 1);
    }

    #[tokio::test]
    async fn test_no_two_leases_share_a_credential() {
        let pool = pool(2);
        let a = pool.acquire().await;
        let b = pool.acquire().await;
        assert_ne!(a.index(), b.index());
        assert!(pool.try_acquire().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exclusivity_under_concurrency() {
        // Many tasks churning acquire/release never overlap on an index
        let pool = Arc::new(pool(3));
        let in_use: Arc<Vec<AtomicBool>> =
            Arc::new((0..3).map(|_| AtomicBool::new(false)).collect());

        let mut tasks = JoinSet::new();
        for _ in 0..12 {
            let pool = Arc::clone(&pool);
            let in_use = Arc::clone(&in_use);
            tasks.spawn(async move {
                for _ in 0..5 {
                    let lease = pool.acquire().await;
                    let slot = &in_use[lease.index()];
                    assert!(
                        !slot.swap(true, Ordering::SeqCst),
                        "credential {} double-leased",
                        lease.index()
                    );
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    slot.store(false, Ordering::SeqCst);
                    pool.release(lease);
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }
        assert_eq!(pool.available_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_respected() {
        let pool = pool(1);
        let lease = pool.acquire().await;
        pool.set_cooldown(lease, Duration::from_secs(5));

        assert!(pool.try_acquire().is_none());
        assert_eq!(pool.available_count(), 0);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(pool.try_acquire().is_none());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let lease = pool.try_acquire().expect("cooldown elapsed");
        assert_eq!(lease.index(), 0);
        pool.release(lease);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_blocks_until_release() {
        let pool = Arc::new(pool(1));
        let lease = pool.acquire().await;

        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.acquire().await.index() })
        };

        // Let the waiter start polling, then free the credential
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!waiter.is_finished());
        pool.release(lease);

        assert_eq!(waiter.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dropped_lease_is_not_leaked() {
        let pool = pool(1);
        {
            let _lease = pool.acquire().await;
        }
        assert!(pool.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_push_appends_with_next_index() {
        let pool = pool(2);
        let credential = pool.push("key-2", "secret-2");
        assert_eq!(credential.index, 2);
        assert_eq!(pool.total_count(), 3);
    }
}
