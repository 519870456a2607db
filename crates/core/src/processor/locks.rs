//! Per-target path locks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

type Slot = Arc<tokio::sync::Mutex<()>>;

/// Serializes work on the same target path.
///
/// `a.m4a` and `a.alac` both map to `a.flac`; holding the target's lock from
/// the existence check through delete keeps two workers from converting
/// into the same file. Unrelated targets never contend.
#[derive(Default)]
pub struct TargetLocks {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `target`.
    pub async fn lock(&self, target: &Path) -> TargetGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(target.to_path_buf()).or_default())
        };
        let guard = Arc::clone(&slot).lock_owned().await;
        TargetGuard {
            locks: self,
            target: target.to_path_buf(),
            slot,
            _guard: guard,
        }
    }

    /// Number of targets currently tracked.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one target path. Released on drop.
pub struct TargetGuard<'a> {
    locks: &'a TargetLocks,
    target: PathBuf,
    slot: Slot,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for TargetGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self
            .locks
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Map entry, `self.slot` and the held guard: nobody else is waiting.
        if Arc::strong_count(&self.slot) == 3 {
            slots.remove(&self.target);
        }
    }
}
