//! Ledger store port - persistence abstraction

use crate::domain::result::Result;
use crate::domain::LedgerRecord;

/// Outcome of applying a classified batch to the ledger
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ApplyStats {
    /// Records inserted as new
    pub inserted: usize,
    /// Duplicates skipped to preserve the existing record
    pub skipped: usize,
    /// Provisional records overwritten and cleared by their settlement
    pub replaced: usize,
}

/// Ledger persistence abstraction
///
/// The reconciliation engine only ever sees the snapshot; the store is the
/// single writer and interprets the verdict fields attached to each
/// candidate:
///
/// - not a duplicate: insert
/// - duplicate, `should_replace` unset or false: skip
/// - duplicate with `should_replace`: overwrite the referenced provisional
///   record with the candidate's content and mark it cleared
pub trait LedgerStore: Send + Sync {
    /// Full current snapshot of ledger records
    fn snapshot(&self) -> Result<Vec<LedgerRecord>>;

    /// Apply a classified candidate batch
    fn apply(&self, classified: &[LedgerRecord]) -> Result<ApplyStats>;
}
