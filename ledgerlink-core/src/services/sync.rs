//! Sync service - run the feed-to-ledger reconciliation pipeline

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::AccountMap;
use crate::ports::{ApplyStats, FeedProvider, LedgerStore};
use crate::services::mapper::{MapperService, SkippedSource};
use crate::services::reconcile::{count_duplicates, ReconcileOptions, Reconciler};

/// Sync service wiring feed providers, the mapper, the reconciliation
/// engine and the ledger store together
pub struct SyncService {
    providers: HashMap<String, Arc<dyn FeedProvider>>,
    store: Arc<dyn LedgerStore>,
    accounts: AccountMap,
    options: ReconcileOptions,
    default_provider: String,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        accounts: AccountMap,
        options: ReconcileOptions,
        default_provider: impl Into<String>,
    ) -> Self {
        Self {
            providers: HashMap::new(),
            store,
            accounts,
            options,
            default_provider: default_provider.into(),
        }
    }

    /// Register a feed provider under its name
    pub fn register(&mut self, provider: Arc<dyn FeedProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fetch, map, classify, and (unless `dry_run`) apply one batch
    pub fn sync(&self, provider: Option<&str>, dry_run: bool) -> Result<SyncResult> {
        let name = provider.unwrap_or(&self.default_provider);
        let provider = self
            .providers
            .get(name)
            .ok_or_else(|| Error::not_found(format!("feed provider: {name}")))?;

        let fetched = provider.fetch()?;
        let discovered = fetched.transactions.len();

        let mapper = MapperService::new(self.accounts.clone());
        let outcome = mapper.map_all(&fetched.transactions);

        let snapshot = self.store.snapshot()?;
        let engine = Reconciler::new(&snapshot, self.options);
        let classified = engine.classify_all(outcome.records);

        let duplicates = count_duplicates(&classified);
        let replaced = classified
            .iter()
            .filter(|r| r.should_replace == Some(true))
            .count();
        let stats = BatchStats {
            discovered,
            mapped: classified.len(),
            unmapped_skipped: outcome.skipped.len(),
            new: classified.len() - duplicates,
            duplicates,
            replaced,
        };

        let apply = if dry_run {
            None
        } else {
            Some(self.store.apply(&classified)?)
        };

        info!(
            provider = name,
            discovered = stats.discovered,
            new = stats.new,
            duplicates = stats.duplicates,
            dry_run,
            "sync finished"
        );

        Ok(SyncResult {
            provider: name.to_string(),
            dry_run,
            stats,
            warnings: fetched.warnings,
            skipped: outcome.skipped,
            records: classified,
            apply,
        })
    }
}

/// Per-stage breakdown of one sync run
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Transactions reported by the feed
    pub discovered: usize,
    /// Candidates produced by the mapper
    pub mapped: usize,
    /// Source records dropped for lack of an account mapping or a
    /// representable amount
    pub unmapped_skipped: usize,
    /// Candidates classified as new
    pub new: usize,
    /// Candidates classified as duplicates (including settlements)
    pub duplicates: usize,
    /// Duplicates that supersede a provisional record
    pub replaced: usize,
}

/// Result of one sync run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub provider: String,
    pub dry_run: bool,
    pub stats: BatchStats,
    /// Feed-side warnings (malformed rows etc.)
    pub warnings: Vec<String>,
    /// Mapper-side drops
    pub skipped: Vec<SkippedSource>,
    /// The classified batch, verdicts attached
    pub records: Vec<crate::domain::LedgerRecord>,
    /// Store outcome, absent on dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<ApplyStats>,
}
