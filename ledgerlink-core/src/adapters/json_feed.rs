//! JSON feed adapter - read source transactions from a feed export file

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::result::Result;
use crate::domain::{SourceTransaction, TransactionState};
use crate::ports::{FeedProvider, FetchOutcome};

/// One transaction as the feed serializes it
///
/// The feed reports settlement as an `isPending` flag plus an id that is
/// only meaningful once settled; conversion promotes the pair into the
/// [`TransactionState`] variants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeedTransaction {
    #[serde(default)]
    id: Option<String>,
    account_id: String,
    date: NaiveDate,
    amount: Decimal,
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_pending: bool,
}

/// Feed provider reading a JSON array of feed transactions
pub struct JsonFeedProvider {
    path: PathBuf,
}

impl JsonFeedProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedProvider for JsonFeedProvider {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch(&self) -> Result<FetchOutcome> {
        let file = File::open(&self.path)?;
        let raw: Vec<RawFeedTransaction> = serde_json::from_reader(BufReader::new(file))?;

        let mut outcome = FetchOutcome::default();
        for tx in raw {
            let state = if tx.is_pending {
                TransactionState::Provisional
            } else {
                match tx.id {
                    Some(id) => TransactionState::Settled(id),
                    None => {
                        outcome.warnings.push(format!(
                            "settled transaction on {} for account {} has no id, skipped",
                            tx.date, tx.account_id
                        ));
                        continue;
                    }
                }
            };
            outcome.transactions.push(SourceTransaction {
                state,
                account_id: tx.account_id,
                date: tx.date,
                amount: tx.amount,
                merchant: tx.merchant,
                description: tx.description,
            });
        }

        Ok(outcome)
    }
}
