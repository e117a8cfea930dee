//! In-process key-value store.
//!
//! Used by tests and by hosts that keep persistence on their side of the
//! boundary and only need the service's in-memory semantics.

use crate::store::{KvSnapshot, KvStore, StoreResult};
use std::cell::RefCell;

/// `RefCell`-backed store. Single-threaded like the service that owns it.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<KvSnapshot>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries(entries: KvSnapshot) -> Self {
        Self {
            entries: RefCell::new(entries),
        }
    }

    /// Returns a copy of everything currently stored.
    pub fn dump(&self) -> KvSnapshot {
        self.entries.borrow().clone()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, keys: &[&str]) -> StoreResult<KvSnapshot> {
        let entries = self.entries.borrow();
        Ok(keys
            .iter()
            .filter_map(|key| {
                entries
                    .get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect())
    }

    fn set(&self, entries: KvSnapshot) -> StoreResult<()> {
        self.entries.borrow_mut().extend(entries);
        Ok(())
    }
}
