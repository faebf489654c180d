//! Target-ledger record model and classification verdicts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::imported_id::{ContentKey, ImportedId};

/// Marker prefixed onto the notes of a provisional record
///
/// Written by the mapper and read back by the legacy matching tier; strip
/// it with [`strip_pending_marker`] wherever note or payee text is compared.
pub const PENDING_MARKER: &str = "[PENDING] ";

/// Remove the pending marker from note/payee text, if present
pub fn strip_pending_marker(text: &str) -> &str {
    text.strip_prefix(PENDING_MARKER).unwrap_or(text)
}

/// A transaction record in the target ledger
///
/// Created fresh by the mapper for every run; the reconciliation engine
/// attaches the classification fields in place and the record is then
/// handed to the persistence layer, which never mutates it further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    /// Ledger-assigned opaque id
    pub id: Uuid,
    pub date: NaiveDate,
    /// Integer minor currency units (cents); conversion from the feed is
    /// decimal-exact, never through binary floats
    pub amount: i64,
    pub payee_name: Option<String>,
    /// Ledger account identifier
    pub account: String,
    /// Inverse of provisional
    pub cleared: bool,
    pub notes: Option<String>,
    /// External correlation key; the primary deduplication key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_id: Option<ImportedId>,

    // Attached by the reconciliation engine
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_replace: Option<bool>,
}

impl LedgerRecord {
    /// Create a record with required fields
    pub fn new(account: impl Into<String>, date: NaiveDate, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            payee_name: None,
            account: account.into(),
            cleared: true,
            notes: None,
            imported_id: None,
            is_duplicate: false,
            duplicate_of_id: None,
            should_replace: None,
        }
    }

    /// Content key recomputed from the raw record fields
    ///
    /// `None` when the record has no payee; matching rules that need the
    /// key are skipped for such records.
    pub fn content_key(&self) -> Option<ContentKey> {
        let payee = self.payee_name.as_deref()?;
        Some(ContentKey::new(&self.account, self.date, self.amount, payee))
    }

    /// True while the record is a provisional entry: uncleared, or still
    /// carrying the pending marker from an earlier revision of the mapper.
    pub fn is_provisional(&self) -> bool {
        if !self.cleared {
            return true;
        }
        self.notes.as_deref().is_some_and(|n| n.contains(PENDING_MARKER.trim_end()))
            || self
                .payee_name
                .as_deref()
                .is_some_and(|p| p.contains(PENDING_MARKER.trim_end()))
    }

    /// Attach a classification verdict
    pub fn apply_verdict(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::New => {
                self.is_duplicate = false;
                self.duplicate_of_id = None;
                self.should_replace = None;
            }
            Verdict::Duplicate {
                duplicate_of_id,
                should_replace,
            } => {
                self.is_duplicate = true;
                self.duplicate_of_id = Some(*duplicate_of_id);
                self.should_replace = Some(*should_replace);
            }
        }
    }
}

/// Classification of one candidate record against the ledger snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum Verdict {
    /// Not present in the ledger; insert it
    New,
    /// Same real-world transaction as an existing record
    Duplicate {
        /// Ledger id of the existing record
        duplicate_of_id: Uuid,
        /// True when the existing record is a provisional entry that the
        /// candidate settles: overwrite and clear it instead of skipping
        should_replace: bool,
    },
}

impl Verdict {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Verdict::Duplicate { .. })
    }

    pub fn should_replace(&self) -> bool {
        matches!(
            self,
            Verdict::Duplicate {
                should_replace: true,
                ..
            }
        )
    }
}
