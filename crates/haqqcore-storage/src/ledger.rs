//! Per-wallet rotation progress, durably recorded.
//!
//! The ledger is the coordinator's crash-recovery record: one entry
//! per account whose provider has been mutated and verified in the
//! current attempt. Every mutation is a single synchronous store write
//! — no batching — so a crash between two wallet steps leaves the
//! ledger consistent with exactly the providers actually mutated,
//! never ahead of or behind reality.
//!
//! Entries are kept in insertion order; rollback replays them in the
//! same order forward progress recorded them.

use haqqcore_types::{HaqqCoreError, Result, SecureKv};

/// Secure-store key holding the progress entries.
const PROGRESS_KEY: &str = "pin.rotation.progress";

// ---------------------------------------------------------------------------
// RotationLedger
// ---------------------------------------------------------------------------

/// Durable record of which accounts completed the current rotation step.
pub struct RotationLedger<'a> {
    kv: &'a dyn SecureKv,
}

impl<'a> RotationLedger<'a> {
    /// Creates a ledger over the given secure store.
    pub fn new(kv: &'a dyn SecureKv) -> Self {
        Self { kv }
    }

    /// Records `account_id` as completed. Idempotent.
    pub fn mark(&self, account_id: &str) -> Result<()> {
        let mut entries = self.read()?;
        if !entries.iter().any(|e| e == account_id) {
            entries.push(account_id.to_string());
            self.write(&entries)?;
        }
        Ok(())
    }

    /// Removes `account_id` from the record. Idempotent.
    ///
    /// Rollback clears entries one by one as each compensating step
    /// succeeds, so an interrupted rollback retains exactly the
    /// still-unresolved accounts.
    pub fn unmark(&self, account_id: &str) -> Result<()> {
        let mut entries = self.read()?;
        let before = entries.len();
        entries.retain(|e| e != account_id);
        if entries.len() != before {
            if entries.is_empty() {
                self.kv.remove(PROGRESS_KEY)?;
            } else {
                self.write(&entries)?;
            }
        }
        Ok(())
    }

    /// Whether `account_id` is recorded as completed.
    pub fn is_marked(&self, account_id: &str) -> Result<bool> {
        Ok(self.read()?.iter().any(|e| e == account_id))
    }

    /// Returns all completed accounts, in the order they were marked.
    pub fn marked(&self) -> Result<Vec<String>> {
        self.read()
    }

    /// Removes every entry in one write.
    pub fn clear_all(&self) -> Result<()> {
        self.kv.remove(PROGRESS_KEY)
    }

    /// Whether any entry exists — i.e. whether a prior attempt was
    /// interrupted and recovery is required before any other
    /// credential operation.
    pub fn has_pending_rotation(&self) -> Result<bool> {
        Ok(!self.read()?.is_empty())
    }

    // -- Internal ---------------------------------------------------------

    fn read(&self) -> Result<Vec<String>> {
        match self.kv.get(PROGRESS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => bincode::deserialize(&raw).map_err(|e| HaqqCoreError::StorageError {
                reason: format!("corrupt rotation progress record: {e}"),
            }),
        }
    }

    fn write(&self, entries: &[String]) -> Result<()> {
        let raw = bincode::serialize(entries).map_err(|e| HaqqCoreError::StorageError {
            reason: format!("rotation progress serialization failed: {e}"),
        })?;
        self.kv.set(PROGRESS_KEY, &raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[test]
    fn starts_empty() -> Result<()> {
        let kv = MemoryKv::new();
        let ledger = RotationLedger::new(&kv);
        assert!(!ledger.has_pending_rotation()?);
        assert!(ledger.marked()?.is_empty());
        assert!(!ledger.is_marked("acc-1")?);
        Ok(())
    }

    #[test]
    fn mark_preserves_insertion_order() -> Result<()> {
        let kv = MemoryKv::new();
        let ledger = RotationLedger::new(&kv);
        ledger.mark("acc-2")?;
        ledger.mark("acc-1")?;
        ledger.mark("acc-3")?;
        assert_eq!(ledger.marked()?, vec!["acc-2", "acc-1", "acc-3"]);
        Ok(())
    }

    #[test]
    fn mark_is_idempotent() -> Result<()> {
        let kv = MemoryKv::new();
        let ledger = RotationLedger::new(&kv);
        ledger.mark("acc-1")?;
        ledger.mark("acc-1")?;
        assert_eq!(ledger.marked()?, vec!["acc-1"]);
        Ok(())
    }

    #[test]
    fn unmark_removes_single_entry() -> Result<()> {
        let kv = MemoryKv::new();
        let ledger = RotationLedger::new(&kv);
        ledger.mark("acc-1")?;
        ledger.mark("acc-2")?;
        ledger.unmark("acc-1")?;
        assert_eq!(ledger.marked()?, vec!["acc-2"]);
        assert!(ledger.has_pending_rotation()?);

        ledger.unmark("acc-2")?;
        assert!(!ledger.has_pending_rotation()?);
        Ok(())
    }

    #[test]
    fn clear_all_empties_in_one_step() -> Result<()> {
        let kv = MemoryKv::new();
        let ledger = RotationLedger::new(&kv);
        ledger.mark("acc-1")?;
        ledger.mark("acc-2")?;
        ledger.clear_all()?;
        assert!(!ledger.has_pending_rotation()?);
        assert!(ledger.marked()?.is_empty());
        Ok(())
    }

    #[test]
    fn state_is_durable_across_ledger_instances() -> Result<()> {
        let kv = MemoryKv::new();
        RotationLedger::new(&kv).mark("acc-1")?;
        // A fresh ledger over the same store sees the pending entry,
        // which is what forces recovery after a crash.
        assert!(RotationLedger::new(&kv).has_pending_rotation()?);
        Ok(())
    }
}
