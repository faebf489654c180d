//! Mapper service - convert feed transactions into ledger record candidates

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::warn;

use crate::domain::result::MapError;
use crate::domain::{
    AccountMap, ContentKey, ImportedId, LedgerRecord, SourceTransaction, TransactionState,
    PENDING_MARKER,
};

/// Convert currency units to integer minor units, decimal-exact
///
/// Values like 19.99 must map to exactly 1999; multiplying through binary
/// floats misrounds them, so everything stays in `Decimal` until the final
/// integer extraction. Sub-cent precision rounds to the nearest cent, half
/// away from zero.
fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// A source record dropped from a batch, with the reason
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSource {
    pub source_account_id: String,
    pub date: NaiveDate,
    pub reason: String,
}

/// Result of mapping a batch of feed transactions
///
/// Skipped records are an explicit return channel rather than only a log
/// side effect, so callers (and tests) can assert on them.
#[derive(Debug, Default)]
pub struct MapOutcome {
    pub records: Vec<LedgerRecord>,
    pub skipped: Vec<SkippedSource>,
}

/// Mapper service for feed-to-ledger record conversion
pub struct MapperService {
    accounts: AccountMap,
}

impl MapperService {
    pub fn new(accounts: AccountMap) -> Self {
        Self { accounts }
    }

    /// Map one feed transaction into a ledger record candidate
    ///
    /// Fails per-record: an unmapped account or unrepresentable amount
    /// rejects this record only, never the batch.
    pub fn map(&self, source: &SourceTransaction) -> Result<LedgerRecord, MapError> {
        let account = self
            .accounts
            .ledger_account(&source.account_id)
            .ok_or_else(|| MapError::UnmappedAccount(source.account_id.clone()))?;

        let amount =
            to_minor_units(source.amount).ok_or(MapError::InvalidAmount(source.amount))?;

        let provisional = source.state.is_provisional();

        let mut record = LedgerRecord::new(account, source.date, amount);
        record.payee_name = source.merchant.clone();
        record.cleared = !provisional;
        record.notes = if provisional {
            Some(format!(
                "{PENDING_MARKER}{}",
                source.description.as_deref().unwrap_or("")
            ))
        } else {
            source.description.clone()
        };
        record.imported_id = Some(match &source.state {
            TransactionState::Settled(feed_id) => ImportedId::settled(feed_id),
            TransactionState::Provisional => {
                // No stable id yet; derive the synthetic key from content so
                // the settled version can be linked back later
                let payee = source.merchant.as_deref().unwrap_or("");
                ImportedId::pending(&ContentKey::new(account, source.date, amount, payee))
            }
        });

        Ok(record)
    }

    /// Map a batch, dropping records that fail with a per-record diagnostic
    pub fn map_all(&self, sources: &[SourceTransaction]) -> MapOutcome {
        let mut outcome = MapOutcome::default();

        for source in sources {
            match self.map(source) {
                Ok(record) => outcome.records.push(record),
                Err(err) => {
                    warn!(
                        source_account = %source.account_id,
                        date = %source.date,
                        "skipping feed transaction: {err}"
                    );
                    outcome.skipped.push(SkippedSource {
                        source_account_id: source.account_id.clone(),
                        date: source.date,
                        reason: err.to_string(),
                    });
                }
            }
        }

        outcome
    }
}
