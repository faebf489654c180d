//! JSON-file ledger store
//!
//! Persists the ledger as a pretty-printed JSON array of records. Writes go
//! through a temp file in the same directory and an atomic rename, so a
//! crash mid-write never truncates the ledger.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::domain::LedgerRecord;
use crate::ports::{ApplyStats, LedgerStore};

pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<LedgerRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn write(&self, records: &[LedgerRecord]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::store(format!("ledger path has no parent: {:?}", self.path)))?;
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(records)?.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| Error::store(format!("failed to persist ledger: {e}")))?;
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn snapshot(&self) -> Result<Vec<LedgerRecord>> {
        self.load()
    }

    fn apply(&self, classified: &[LedgerRecord]) -> Result<ApplyStats> {
        let mut records = self.load()?;
        let mut stats = ApplyStats::default();

        for candidate in classified {
            if !candidate.is_duplicate {
                records.push(candidate.clone());
                stats.inserted += 1;
                continue;
            }

            if candidate.should_replace != Some(true) {
                stats.skipped += 1;
                continue;
            }

            // Settlement of a provisional record: overwrite its content and
            // clear it, keeping the ledger-assigned id stable
            let target = candidate
                .duplicate_of_id
                .and_then(|of| records.iter_mut().find(|r| r.id == of));
            match target {
                Some(existing) => {
                    existing.date = candidate.date;
                    existing.amount = candidate.amount;
                    existing.payee_name = candidate.payee_name.clone();
                    existing.account = candidate.account.clone();
                    existing.notes = candidate.notes.clone();
                    existing.imported_id = candidate.imported_id.clone();
                    existing.cleared = true;
                    stats.replaced += 1;
                }
                None => {
                    // Snapshot raced a concurrent writer; keep the data
                    warn!(
                        candidate = %candidate.id,
                        "replacement target missing from ledger, inserting instead"
                    );
                    let mut clean = candidate.clone();
                    clean.apply_verdict(&crate::domain::Verdict::New);
                    records.push(clean);
                    stats.inserted += 1;
                }
            }
        }

        self.write(&records)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImportedId, Verdict};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> (tempfile::TempDir, JsonLedgerStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonLedgerStore::new(dir.path().join("ledger.json"));
        (dir, store)
    }

    #[test]
    fn test_snapshot_of_missing_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_apply_inserts_new_records() {
        let (_dir, store) = store();

        let mut record = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        record.imported_id = Some(ImportedId::settled("1"));
        let stats = store.apply(&[record]).unwrap();

        assert_eq!(stats.inserted, 1);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].amount, 1999);
    }

    #[test]
    fn test_apply_skips_plain_duplicates() {
        let (_dir, store) = store();

        let mut record = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        record.imported_id = Some(ImportedId::settled("1"));
        store.apply(&[record.clone()]).unwrap();

        let existing_id = store.snapshot().unwrap()[0].id;
        record.apply_verdict(&Verdict::Duplicate {
            duplicate_of_id: existing_id,
            should_replace: false,
        });
        let stats = store.apply(&[record]).unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(store.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_apply_replaces_and_clears_provisional() {
        let (_dir, store) = store();

        let mut pending = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        pending.cleared = false;
        pending.payee_name = Some("Starbucks".to_string());
        pending.notes = Some("[PENDING] latte".to_string());
        pending.imported_id = Some(ImportedId::parse("pending_A1_2024-01-05_1999_starbucks"));
        store.apply(&[pending]).unwrap();
        let pending_id = store.snapshot().unwrap()[0].id;

        let mut settled = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        settled.payee_name = Some("Starbucks".to_string());
        settled.notes = Some("latte".to_string());
        settled.imported_id = Some(ImportedId::settled("999"));
        settled.apply_verdict(&Verdict::Duplicate {
            duplicate_of_id: pending_id,
            should_replace: true,
        });
        let stats = store.apply(&[settled]).unwrap();

        assert_eq!(stats.replaced, 1);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        let record = &snapshot[0];
        assert_eq!(record.id, pending_id, "ledger id stays stable");
        assert!(record.cleared);
        assert_eq!(record.notes.as_deref(), Some("latte"));
        assert_eq!(record.imported_id.as_ref().unwrap().to_string(), "src_999");
    }

    #[test]
    fn test_apply_with_missing_target_inserts() {
        let (_dir, store) = store();

        let mut settled = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        settled.imported_id = Some(ImportedId::settled("999"));
        settled.apply_verdict(&Verdict::Duplicate {
            duplicate_of_id: uuid::Uuid::new_v4(),
            should_replace: true,
        });
        let stats = store.apply(&[settled]).unwrap();

        assert_eq!(stats.inserted, 1);
        assert_eq!(store.snapshot().unwrap().len(), 1);
    }
}
