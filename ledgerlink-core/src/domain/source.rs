//! Source-feed transaction model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement state of a feed transaction
///
/// The feed reports every transaction twice: first provisionally, without a
/// stable identifier, then settled under a feed-assigned id that bears no
/// relationship to anything seen before. The two states are modeled as
/// variants so matching rules are total functions over the state instead of
/// string checks on an optional id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "camelCase")]
pub enum TransactionState {
    /// Not yet final; amount and details may still change
    Provisional,
    /// Final, carrying the stable feed-assigned identifier
    Settled(String),
}

impl TransactionState {
    pub fn is_provisional(&self) -> bool {
        matches!(self, TransactionState::Provisional)
    }

    /// Stable feed id, present only once settled
    pub fn feed_id(&self) -> Option<&str> {
        match self {
            TransactionState::Provisional => None,
            TransactionState::Settled(id) => Some(id),
        }
    }
}

/// A single transaction as reported by the external feed
///
/// Read-only input: the mapper converts it into a [`LedgerRecord`]
/// candidate, it is never persisted itself.
///
/// [`LedgerRecord`]: crate::domain::LedgerRecord
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTransaction {
    #[serde(flatten)]
    pub state: TransactionState,
    /// Feed-side account identifier, mapped to a ledger account by config
    pub account_id: String,
    /// Calendar date, no time component
    pub date: NaiveDate,
    /// Signed amount in currency units, decimal-exact
    pub amount: Decimal,
    pub merchant: Option<String>,
    pub description: Option<String>,
}

impl SourceTransaction {
    /// Create a settled transaction with required fields
    pub fn settled(
        feed_id: impl Into<String>,
        account_id: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            state: TransactionState::Settled(feed_id.into()),
            account_id: account_id.into(),
            date,
            amount,
            merchant: None,
            description: None,
        }
    }

    /// Create a provisional transaction with required fields
    pub fn provisional(
        account_id: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            state: TransactionState::Provisional,
            account_id: account_id.into(),
            date,
            amount,
            merchant: None,
            description: None,
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
