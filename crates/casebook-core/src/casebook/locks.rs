//! Per-parent writer locks.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::ParentRef;

type LockMap = HashMap<ParentRef, Arc<AsyncMutex<()>>>;

/// Serializes writers of the same parent while letting different parents
/// proceed in parallel. A parent only has an entry while someone holds or
/// waits for its lock.
#[derive(Debug, Default)]
pub struct ParentLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl ParentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to `parent`. The guard releases the
    /// lock when dropped.
    pub async fn acquire(&self, parent: ParentRef) -> ParentGuard {
        let lock = Arc::clone(lock_map(&self.locks).entry(parent).or_default());
        ParentGuard {
            guard: Some(lock.lock_owned().await),
            parent,
            locks: Arc::clone(&self.locks),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        lock_map(&self.locks).len()
    }
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Exclusive write access to one parent.
#[derive(Debug)]
pub struct ParentGuard {
    guard: Option<OwnedMutexGuard<()>>,
    parent: ParentRef,
    locks: Arc<Mutex<LockMap>>,
}

impl Drop for ParentGuard {
    fn drop(&mut self) {
        // Holding the map keeps new acquirers from cloning the entry between
        // the release and the count check.
        let mut locks = lock_map(&self.locks);
        drop(self.guard.take());
        let idle = locks
            .get(&self.parent)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.parent);
        }
    }
}
