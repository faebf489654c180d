//! CSV feed adapter - read source transactions from a CSV export
//!
//! Expected headers (case-insensitive): `id`, `account_id`, `date`,
//! `amount`, `merchant`, `description`, `pending`. Malformed rows are
//! skipped with a warning; they never abort the batch.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{SourceTransaction, TransactionState};
use crate::ports::{FeedProvider, FetchOutcome};

/// Feed provider reading a CSV export
pub struct CsvFeedProvider {
    path: PathBuf,
}

impl CsvFeedProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct Columns {
    id: Option<usize>,
    account_id: usize,
    date: usize,
    amount: usize,
    merchant: Option<usize>,
    description: Option<usize>,
    pending: Option<usize>,
}

impl Columns {
    fn detect(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Ok(Self {
            id: find("id"),
            account_id: find("account_id")
                .ok_or_else(|| Error::feed("column 'account_id' not found"))?,
            date: find("date").ok_or_else(|| Error::feed("column 'date' not found"))?,
            amount: find("amount").ok_or_else(|| Error::feed("column 'amount' not found"))?,
            merchant: find("merchant"),
            description: find("description"),
            pending: find("pending"),
        })
    }
}

impl FeedProvider for CsvFeedProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self) -> Result<FetchOutcome> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let columns = Columns::detect(reader.headers()?)?;

        let mut outcome = FetchOutcome::default();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let get = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            };

            let Some(date) = get(Some(columns.date)).and_then(parse_date) else {
                outcome
                    .warnings
                    .push(format!("row {}: unparseable date, skipped", line + 2));
                continue;
            };
            let Some(amount) = get(Some(columns.amount)).and_then(parse_amount) else {
                outcome
                    .warnings
                    .push(format!("row {}: unparseable amount, skipped", line + 2));
                continue;
            };
            let Some(account_id) = get(Some(columns.account_id)) else {
                outcome
                    .warnings
                    .push(format!("row {}: missing account_id, skipped", line + 2));
                continue;
            };

            let pending = get(columns.pending)
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false);
            let state = if pending {
                TransactionState::Provisional
            } else {
                match get(columns.id) {
                    Some(id) => TransactionState::Settled(id.to_string()),
                    None => {
                        outcome.warnings.push(format!(
                            "row {}: settled transaction without id, skipped",
                            line + 2
                        ));
                        continue;
                    }
                }
            };

            outcome.transactions.push(SourceTransaction {
                state,
                account_id: account_id.to_string(),
                date,
                amount,
                merchant: get(columns.merchant).map(str::to_string),
                description: get(columns.description).map(str::to_string),
            });
        }

        Ok(outcome)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // Try common formats
    let formats = [
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
        "%m-%d-%Y",
        "%d-%m-%Y",
        "%Y/%m/%d",
    ];

    for fmt in &formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();

    // Handle parentheses notation for negative numbers: (100.00) -> -100.00
    let (is_negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    // Remove currency symbols, commas, whitespace
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let mut amount: Decimal = cleaned.parse().ok()?;

    if is_negative && amount > Decimal::ZERO {
        amount = -amount;
    }

    Some(amount)
}
