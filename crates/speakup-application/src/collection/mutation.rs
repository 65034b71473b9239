//! Per-target bookkeeping for optimistic mutations.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Where an entity stands with respect to local edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// No edit recorded.
    Clean,
    /// Shown locally, awaiting the server.
    Pending,
    /// The server accepted the edit.
    Committed,
    /// The server refused; the previous value was restored.
    RolledBack,
}

/// The latest edit applied to one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord<T> {
    pub previous: T,
    /// `None` for removals.
    pub pending: Option<T>,
    pub phase: MutationPhase,
}

/// Serialises edits per entity id and remembers the latest one.
pub(crate) struct MutationLedger<T> {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    records: Mutex<BTreeMap<String, MutationRecord<T>>>,
}

impl<T: Clone> MutationLedger<T> {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// Waits until no other edit for `target_id` is in flight. The lock
    /// entry is dropped again once the last holder or waiter is done.
    pub async fn lock_target(&self, target_id: &str) -> TargetTurn<'_, T> {
        let lock = {
            let mut locks = self.locks();
            locks
                .entry(target_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        TargetTurn {
            ledger: self,
            target_id: target_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    pub fn locked_targets(&self) -> usize {
        self.locks().len()
    }

    pub fn begin(&self, target_id: &str, previous: T, pending: Option<T>) {
        self.records().insert(
            target_id.to_string(),
            MutationRecord {
                previous,
                pending,
                phase: MutationPhase::Pending,
            },
        );
    }

    pub fn finish(&self, target_id: &str, phase: MutationPhase) {
        if let Some(record) = self.records().get_mut(target_id) {
            record.phase = phase;
        }
    }

    pub fn phase(&self, target_id: &str) -> MutationPhase {
        self.records()
            .get(target_id)
            .map_or(MutationPhase::Clean, |r| r.phase)
    }

    pub fn record(&self, target_id: &str) -> Option<MutationRecord<T>> {
        self.records().get(target_id).cloned()
    }

    /// Drops every settled record, e.g. after a fresh list replaced them.
    pub fn forget_settled(&self) {
        self.records()
            .retain(|_, r| r.phase == MutationPhase::Pending);
    }

    fn locks(&self) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<String, MutationRecord<T>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive turn to edit one target.
pub(crate) struct TargetTurn<'a, T: Clone> {
    ledger: &'a MutationLedger<T>,
    target_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<T: Clone> Drop for TargetTurn<'_, T> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.ledger.locks();
        // Waiters hold a clone of the Arc, so a count of one means nobody
        // else wants this target.
        if locks
            .get(&self.target_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.target_id);
        }
    }
}
