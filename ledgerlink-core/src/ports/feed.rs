//! Feed provider port
//!
//! Defines the interface for fetching source transactions from an external
//! feed (JSON export, CSV export, demo data, ...).

use crate::domain::result::Result;
use crate::domain::SourceTransaction;

/// Result of fetching transactions from a feed
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub transactions: Vec<SourceTransaction>,
    /// Non-fatal per-record problems (malformed rows, missing ids)
    pub warnings: Vec<String>,
}

/// Feed provider trait
///
/// Implementations materialize the full batch in memory before returning;
/// the reconciliation pipeline is synchronous and never does I/O itself.
pub trait FeedProvider: Send + Sync {
    /// Provider name (e.g., "json", "csv", "demo")
    fn name(&self) -> &str;

    /// Fetch all transactions the feed currently reports
    fn fetch(&self) -> Result<FetchOutcome>;
}
