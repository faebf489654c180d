//! Reconciliation engine - classify candidate records against the ledger
//!
//! The engine decides, for each mapped candidate, whether it already exists
//! in the ledger, is new, or settles a previously recorded provisional
//! record. The hard case is the last one: the feed-assigned id of a settled
//! transaction bears no lexical relationship to the synthetic id of its
//! provisional predecessor, so the link is made through content equality
//! (account + date + amount + payee), computed independently on both sides.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{LedgerRecord, Verdict, PENDING_MARKER};

/// Tuning knobs for a reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Enable the legacy matching tier: a linear scan on date+amount with
    /// permissive payee disambiguation, for ledgers persisted before
    /// synthetic keys existed. Known source of false positives; off unless
    /// backward output compatibility is required.
    pub legacy_fallback: bool,
}

/// Reconciliation engine over one ledger snapshot
///
/// Indexes are built once at construction; `classify` is read-only after
/// that. Concurrent runs must each build their own engine from their own
/// snapshot.
pub struct Reconciler<'a> {
    /// Every existing record keyed by its exact imported id
    by_imported_id: HashMap<String, &'a LedgerRecord>,
    /// Existing records with a synthetic (pending-form) imported id, keyed
    /// by the content portion of that id
    pending_by_content_key: HashMap<String, &'a LedgerRecord>,
    existing: &'a [LedgerRecord],
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(existing: &'a [LedgerRecord], options: ReconcileOptions) -> Self {
        let mut by_imported_id = HashMap::new();
        let mut pending_by_content_key = HashMap::new();

        for record in existing {
            if let Some(imported_id) = &record.imported_id {
                by_imported_id.insert(imported_id.to_string(), record);
                if let Some(content) = imported_id.content_key() {
                    pending_by_content_key.insert(content.to_string(), record);
                }
            }
        }

        Self {
            by_imported_id,
            pending_by_content_key,
            existing,
            options,
        }
    }

    /// Classify one candidate, first matching rule wins
    pub fn classify(&self, candidate: &LedgerRecord) -> Verdict {
        // Rule 1: nothing to match on
        let Some(imported_id) = &candidate.imported_id else {
            return Verdict::New;
        };

        // Rule 2: exact imported-id hit, the idempotent re-import case
        if let Some(existing) = self.by_imported_id.get(&imported_id.to_string()) {
            debug!(id = %imported_id, "exact imported-id duplicate");
            return Verdict::Duplicate {
                duplicate_of_id: existing.id,
                should_replace: false,
            };
        }

        // Rule 3: a settled candidate may be the settlement of a pending
        // record. Its own imported id carries no content key, so recompute
        // one from the raw fields; skipped when the candidate has no payee.
        if !imported_id.is_pending() {
            if let Some(key) = candidate.content_key() {
                if let Some(pending) = self.pending_by_content_key.get(&key.to_string()) {
                    debug!(key = %key, "settlement of provisional record");
                    return Verdict::Duplicate {
                        duplicate_of_id: pending.id,
                        should_replace: true,
                    };
                }
            }
        }

        if self.options.legacy_fallback {
            if let Some(verdict) = self.legacy_match(candidate) {
                return verdict;
            }
        }

        Verdict::New
    }

    /// Legacy tier: linear scan on date+amount, permissive payee rules
    fn legacy_match(&self, candidate: &LedgerRecord) -> Option<Verdict> {
        for existing in self.existing {
            if existing.date != candidate.date || existing.amount != candidate.amount {
                continue;
            }
            if legacy_payees_match(existing, candidate) {
                debug!(date = %candidate.date, amount = candidate.amount, "legacy fallback match");
                return Some(Verdict::Duplicate {
                    duplicate_of_id: existing.id,
                    // Only a still-provisional record gets superseded; a
                    // legacy hit on a settled record is a plain duplicate
                    should_replace: existing.is_provisional(),
                });
            }
        }
        None
    }

    /// Classify a whole batch, attaching verdict fields to each candidate
    pub fn classify_all(&self, mut candidates: Vec<LedgerRecord>) -> Vec<LedgerRecord> {
        for candidate in &mut candidates {
            let verdict = self.classify(candidate);
            candidate.apply_verdict(&verdict);
        }
        candidates
    }
}

fn has_pending_marker(record: &LedgerRecord) -> bool {
    record
        .notes
        .as_deref()
        .is_some_and(|n| n.contains(PENDING_MARKER))
        || record
            .payee_name
            .as_deref()
            .is_some_and(|p| p.contains(PENDING_MARKER))
}

fn stripped_payee(record: &LedgerRecord) -> Option<&str> {
    record
        .payee_name
        .as_deref()
        .map(crate::domain::strip_pending_marker)
}

/// Payee disambiguation of the legacy tier, already filtered to
/// date+amount equality
fn legacy_payees_match(existing: &LedgerRecord, candidate: &LedgerRecord) -> bool {
    // (a) existing is marked pending, candidate is not: equal once the
    //     marker is stripped, or either side has no payee at all
    if has_pending_marker(existing) && !has_pending_marker(candidate) {
        return match (stripped_payee(existing), stripped_payee(candidate)) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
    }

    match (existing.payee_name.as_deref(), candidate.payee_name.as_deref()) {
        // (b) both sides carry a payee: must be equal
        (Some(a), Some(b)) => a == b,
        // (c) either side has none: date+amount alone decides
        _ => true,
    }
}

/// Number of duplicates in an already-classified batch
pub fn count_duplicates(classified: &[LedgerRecord]) -> usize {
    classified.iter().filter(|r| r.is_duplicate).count()
}

/// Records classified as new, in batch order
pub fn filter_unique(classified: &[LedgerRecord]) -> Vec<&LedgerRecord> {
    classified.iter().filter(|r| !r.is_duplicate).collect()
}

/// Records classified as duplicates, in batch order
pub fn filter_duplicates(classified: &[LedgerRecord]) -> Vec<&LedgerRecord> {
    classified.iter().filter(|r| r.is_duplicate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImportedId;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Existing provisional record the way the mapper would have written it
    fn pending_record(account: &str, d: NaiveDate, amount: i64, merchant: &str) -> LedgerRecord {
        let mut record = LedgerRecord::new(account, d, amount);
        record.payee_name = Some(merchant.to_string());
        record.cleared = false;
        record.notes = Some(format!("[PENDING] {merchant}"));
        record.imported_id = Some(ImportedId::parse(&format!(
            "pending_{account}_{d}_{amount}_{}",
            crate::domain::merchant_slug(merchant)
        )));
        record
    }

    fn settled_candidate(
        feed_id: &str,
        account: &str,
        d: NaiveDate,
        amount: i64,
        payee: &str,
    ) -> LedgerRecord {
        let mut record = LedgerRecord::new(account, d, amount);
        record.payee_name = Some(payee.to_string());
        record.imported_id = Some(ImportedId::settled(feed_id));
        record
    }

    #[test]
    fn test_no_imported_id_is_new() {
        let existing = vec![pending_record("A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_exact_id_duplicate() {
        let existing = vec![settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: false,
            }
        );
    }

    #[test]
    fn test_exact_id_wins_over_content_differences() {
        // Same imported id but every content field different: still the
        // plain duplicate verdict, content rules are never consulted
        let existing = vec![settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate("999", "A2", date(2024, 2, 9), 4200, "Peets");
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: false,
            }
        );
    }

    #[test]
    fn test_settlement_linkage() {
        let existing = vec![pending_record("A1", date(2024, 1, 5), 1999, "Starbucks")];
        assert_eq!(
            existing[0].imported_id.as_ref().unwrap().to_string(),
            "pending_A1_2024-01-05_1999_starbucks"
        );
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: true,
            }
        );
    }

    #[test]
    fn test_no_settlement_across_accounts() {
        let existing = vec![pending_record("A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate("999", "A2", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_no_settlement_on_different_amount() {
        let existing = vec![pending_record("A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 2099, "Starbucks");
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_pending_candidate_never_settles() {
        // A provisional candidate with a fresh content key is new even when
        // another pending record shares date+amount
        let existing = vec![pending_record("A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = pending_record("A1", date(2024, 1, 5), 1999, "Peets");
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_candidate_without_payee_skips_settlement_rule() {
        let existing = vec![pending_record("A1", date(2024, 1, 5), 1999, "Starbucks")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let mut candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        candidate.payee_name = None;
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_slug_collision_links_settlement() {
        // The 20-char slug truncation makes these merchants collide; the
        // engine reproduces that rather than fixing it
        let existing = vec![pending_record(
            "A1",
            date(2024, 1, 5),
            1999,
            "AmazonMarketplaceServicesFeesLLC",
        )];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate(
            "999",
            "A1",
            date(2024, 1, 5),
            1999,
            "AmazonMarketplaceServicesExtraLLC",
        );
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: true,
            }
        );
    }

    #[test]
    fn test_legacy_fallback_off_by_default() {
        // Existing record predates synthetic keys: no imported id at all
        let mut old = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        old.payee_name = Some("Starbucks".to_string());
        let existing = vec![old];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_legacy_payee_equality_match() {
        let mut old = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        old.payee_name = Some("Starbucks".to_string());
        let existing = vec![old];
        let engine = Reconciler::new(
            &existing,
            ReconcileOptions {
                legacy_fallback: true,
            },
        );

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: false,
            }
        );
    }

    #[test]
    fn test_legacy_marker_stripped_match_replaces() {
        let mut old = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        old.payee_name = Some("[PENDING] Starbucks".to_string());
        old.cleared = false;
        let existing = vec![old];
        let engine = Reconciler::new(
            &existing,
            ReconcileOptions {
                legacy_fallback: true,
            },
        );

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: true,
            }
        );
    }

    #[test]
    fn test_legacy_date_amount_only_when_payee_absent() {
        let old = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        let existing = vec![old];
        let engine = Reconciler::new(
            &existing,
            ReconcileOptions {
                legacy_fallback: true,
            },
        );

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(
            engine.classify(&candidate),
            Verdict::Duplicate {
                duplicate_of_id: existing[0].id,
                should_replace: false,
            }
        );
    }

    #[test]
    fn test_legacy_different_payees_no_match() {
        let mut old = LedgerRecord::new("A1", date(2024, 1, 5), 1999);
        old.payee_name = Some("Peets".to_string());
        let existing = vec![old];
        let engine = Reconciler::new(
            &existing,
            ReconcileOptions {
                legacy_fallback: true,
            },
        );

        let candidate = settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks");
        assert_eq!(engine.classify(&candidate), Verdict::New);
    }

    #[test]
    fn test_classify_all_idempotent() {
        let existing = vec![
            pending_record("A1", date(2024, 1, 5), 1999, "Starbucks"),
            settled_candidate("111", "A1", date(2024, 1, 6), 4200, "Peets"),
        ];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let batch = vec![
            settled_candidate("999", "A1", date(2024, 1, 5), 1999, "Starbucks"),
            settled_candidate("111", "A1", date(2024, 1, 6), 4200, "Peets"),
            settled_candidate("222", "A1", date(2024, 1, 7), 100, "Deli"),
        ];

        let first = engine.classify_all(batch.clone());
        let second = engine.classify_all(first.clone());

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.is_duplicate, b.is_duplicate);
            assert_eq!(a.duplicate_of_id, b.duplicate_of_id);
            assert_eq!(a.should_replace, b.should_replace);
        }
    }

    #[test]
    fn test_derived_views() {
        let existing = vec![settled_candidate("111", "A1", date(2024, 1, 6), 4200, "Peets")];
        let engine = Reconciler::new(&existing, ReconcileOptions::default());

        let batch = vec![
            settled_candidate("111", "A1", date(2024, 1, 6), 4200, "Peets"),
            settled_candidate("222", "A1", date(2024, 1, 7), 100, "Deli"),
        ];
        let classified = engine.classify_all(batch);

        assert_eq!(count_duplicates(&classified), 1);
        assert_eq!(filter_unique(&classified).len(), 1);
        assert_eq!(filter_duplicates(&classified).len(), 1);
        assert_eq!(
            filter_duplicates(&classified)[0].imported_id.as_ref().unwrap().to_string(),
            "src_111"
        );
    }
}
