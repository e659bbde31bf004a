//! In-memory secure store.
//!
//! Process-local [`SecureKv`] implementation for unit tests and for
//! hosts that inject their own platform keystore behind the same
//! contract. Not durable — everything is lost on drop.

use std::collections::HashMap;
use std::sync::Mutex;

use haqqcore_types::{HaqqCoreError, Result, SecureKv};

/// Thread-safe in-memory key/value store.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKv {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureKv for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> HaqqCoreError {
    HaqqCoreError::StorageError {
        reason: "memory store lock poisoned".into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
