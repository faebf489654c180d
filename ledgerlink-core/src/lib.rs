//! Ledgerlink Core - feed-to-ledger reconciliation logic
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (SourceTransaction, LedgerRecord,
//!   imported-id formats)
//! - **ports**: Trait definitions for external dependencies (FeedProvider,
//!   LedgerStore)
//! - **services**: Business logic orchestration (mapper, reconciliation
//!   engine, sync)
//! - **adapters**: Concrete implementations (JSON/CSV feed files, demo
//!   feed, JSON ledger store)
//!
//! The central domain quirk: the feed reports every transaction first as
//! provisional (no stable id) and later as settled (fresh feed-assigned
//! id). The mapper derives a content-based synthetic key for provisional
//! records and the reconciliation engine uses it to link the settled
//! version back, so the same purchase is never recorded twice.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::{CsvFeedProvider, DemoFeedProvider, JsonFeedProvider, JsonLedgerStore};
use config::Config;
use services::SyncService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, MapError, Result};
pub use domain::{
    AccountMap, ContentKey, ImportedId, LedgerRecord, SourceTransaction, TransactionState, Verdict,
};
pub use ports::{ApplyStats, FeedProvider, LedgerStore};

/// Main context for Ledgerlink operations
///
/// The primary entry point for callers: holds the configuration, the
/// ledger store, and the sync service with all built-in feed providers
/// registered.
pub struct LedgerlinkContext {
    pub config: Config,
    pub store: Arc<dyn LedgerStore>,
    pub sync_service: SyncService,
}

impl LedgerlinkContext {
    /// Create a new context rooted at a data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let ledger_path = config.resolve_ledger_path(data_dir);
        let store: Arc<dyn LedgerStore> = Arc::new(JsonLedgerStore::new(ledger_path));

        let mut accounts = config.account_mappings.clone();
        if config.feed.provider == "demo" {
            let demo_map = adapters::demo_account_map();
            for (source, ledger) in demo_map.iter() {
                if accounts.ledger_account(source).is_none() {
                    accounts.insert(source, ledger);
                }
            }
        }

        let mut sync_service = SyncService::new(
            Arc::clone(&store),
            accounts,
            config.reconcile_options(),
            config.feed.provider.clone(),
        );
        sync_service.register(Arc::new(DemoFeedProvider::new()));
        if let Some(path) = &config.feed.path {
            sync_service.register(Arc::new(JsonFeedProvider::new(path)));
            sync_service.register(Arc::new(CsvFeedProvider::new(path)));
        }

        Ok(Self {
            config,
            store,
            sync_service,
        })
    }
}
